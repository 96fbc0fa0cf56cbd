//! Collection loading with optional deferred indexing.
//!
//! A deferred load builds one dimension per `View::index_step` call so that
//! many views sharing one thread of control stay responsive while a large
//! collection is indexed.

use snapshot_core::Record;
use snapshot_index::IndexCollection;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// Options for `View::load_collection`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fields to index; defaults to the fields of the first record.
    pub keys: Option<Vec<String>>,
    /// Primary-key field; defaults to the first indexed field.
    pub primary_key: Option<String>,
    /// Skip the emission that normally follows a load.
    pub suppress_emit: bool,
    /// Build one dimension per scheduling step instead of all at once.
    pub defer_indexing: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    pub fn suppress_emit(mut self, suppress: bool) -> Self {
        self.suppress_emit = suppress;
        self
    }

    pub fn defer_indexing(mut self, defer: bool) -> Self {
        self.defer_indexing = defer;
        self
    }
}

/// Fields to index: the explicit list, or the fields of the first record.
pub(crate) fn resolve_keys(records: &[Record], keys: Option<Vec<String>>) -> Vec<String> {
    match keys {
        Some(keys) => keys,
        None => records
            .first()
            .map(|record| record.keys().map(String::from).collect())
            .unwrap_or_default(),
    }
}

/// A load whose dimensions are still being built.
pub(crate) struct PendingLoad {
    pub(crate) collection: IndexCollection,
    remaining: VecDeque<String>,
    pub(crate) suppress_emit: bool,
    pub(crate) started: Instant,
}

impl PendingLoad {
    pub(crate) fn new(
        records: Arc<[Record]>,
        keys: Vec<String>,
        suppress_emit: bool,
        started: Instant,
    ) -> Self {
        Self {
            collection: IndexCollection::new(records),
            remaining: keys.into(),
            suppress_emit,
            started,
        }
    }

    /// Builds the next dimension. Returns true once every dimension exists.
    pub(crate) fn step(&mut self) -> bool {
        if let Some(key) = self.remaining.pop_front() {
            self.collection.add_dimension(key);
        }
        self.remaining.is_empty()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Builds every remaining dimension.
    pub(crate) fn finish(&mut self) {
        while !self.step() {}
    }
}

/// Collection lifecycle of a view.
pub(crate) enum CollectionState {
    Empty,
    Indexing(PendingLoad),
    Ready(IndexCollection),
}
