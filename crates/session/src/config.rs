//! Session configuration.
//!
//! A `SessionConfig` is applied to the view of every session a registry
//! opens. Every field has a default, so an empty JSON object is a valid
//! configuration.

use crate::channel::{DEFAULT_NAMESPACE, DEFAULT_PREFIX};
use serde::Deserialize;
use snapshot_view::{KeyList, LoadOptions, SortDirection, View};

/// Environment variable overriding `namespace`.
pub const ENV_NAMESPACE: &str = "SNAPSHOT_NAMESPACE";
/// Environment variable overriding `prefix`.
pub const ENV_PREFIX: &str = "SNAPSHOT_PREFIX";

/// Initial sort of a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SortConfig {
    pub key: String,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

/// Defaults applied to each new session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub prefix: String,
    pub namespace: String,
    pub per_page: i64,
    pub page_number: i64,
    pub sort_by: Option<SortConfig>,
    pub groups: KeyList,
    pub ranges: KeyList,
    pub partition: usize,
    pub delta: bool,
    pub defer_indexing: bool,
    pub keys: Option<Vec<String>>,
    pub primary_key: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            per_page: 0,
            page_number: 1,
            sort_by: None,
            groups: KeyList::default(),
            ranges: KeyList::default(),
            partition: 0,
            delta: false,
            defer_indexing: false,
            keys: None,
            primary_key: None,
        }
    }
}

impl SessionConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Applies `SNAPSHOT_NAMESPACE` and `SNAPSHOT_PREFIX` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(namespace) = lookup(ENV_NAMESPACE).filter(|s| !s.is_empty()) {
            self.namespace = namespace;
        }
        if let Some(prefix) = lookup(ENV_PREFIX).filter(|s| !s.is_empty()) {
            self.prefix = prefix;
        }
        self
    }

    /// Configures a fresh view.
    pub fn apply(&self, view: &mut View) {
        view.set_per_page(self.per_page);
        view.set_page_number(self.page_number);
        if let Some(sort) = &self.sort_by {
            view.set_sort_by(sort.key.clone(), sort.direction);
        }
        view.set_groups(self.groups.clone());
        view.set_ranges(self.ranges.clone());
        view.set_partition(self.partition);
        view.use_delta(self.delta);
    }

    /// Load options for collections loaded into a session.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            keys: self.keys.clone(),
            primary_key: self.primary_key.clone(),
            suppress_emit: false,
            defer_indexing: self.defer_indexing,
        }
    }
}
