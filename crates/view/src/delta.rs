//! Delta encoding of outgoing pages.
//!
//! Once a record has been sent in full to a session, later pages carry only
//! its primary-key value. The memory of sent keys only grows.

use hashbrown::HashSet;
use serde::Serialize;
use snapshot_core::{Record, Value};

/// One element of an outgoing page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageEntry {
    /// A record sent in full.
    Record(Record),
    /// The primary-key value of a record sent earlier.
    Key(Value),
}

impl PageEntry {
    /// Returns the full record, if this entry carries one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            PageEntry::Record(record) => Some(record),
            PageEntry::Key(_) => None,
        }
    }

    /// Returns the bare key, if this entry is a reference.
    pub fn as_key(&self) -> Option<&Value> {
        match self {
            PageEntry::Key(key) => Some(key),
            PageEntry::Record(_) => None,
        }
    }
}

/// Remembers which primary keys a session has already received.
#[derive(Clone, Debug, Default)]
pub struct DeltaEncoder {
    memory: HashSet<Value>,
}

impl DeltaEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `page`, replacing already-sent records with their key.
    ///
    /// Every key on the page is remembered afterwards.
    pub fn encode(&mut self, page: &[&Record], primary_key: &str) -> Vec<PageEntry> {
        let entries = page
            .iter()
            .map(|record| {
                let key = record.get_or_null(primary_key);
                if self.memory.contains(&key) {
                    PageEntry::Key(key)
                } else {
                    PageEntry::Record((*record).clone())
                }
            })
            .collect();

        self.memory
            .extend(page.iter().map(|record| record.get_or_null(primary_key)));
        entries
    }

    /// Returns true if `key` has been sent before.
    pub fn remembers(&self, key: &Value) -> bool {
        self.memory.contains(key)
    }

    /// Number of remembered keys.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Forgets every key. Only a collection load does this.
    pub fn clear(&mut self) {
        self.memory.clear();
    }
}

/// Wraps every record of `page` in full.
pub(crate) fn full_page(page: &[&Record]) -> Vec<PageEntry> {
    page.iter().map(|record| PageEntry::Record((*record).clone())).collect()
}
