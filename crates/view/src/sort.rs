//! Sort configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extraction order of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses a direction token.
    ///
    /// `ascending`, `ascend` and `asc` (any case) are ascending; every other
    /// token is descending.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if ["ascending", "ascend", "asc"]
            .iter()
            .any(|t| t.eq_ignore_ascii_case(token))
        {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    #[inline]
    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key and direction of a view.
///
/// Both start unset: extraction then follows the primary key, ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sorting {
    key: Option<String>,
    direction: Option<SortDirection>,
}

impl Sorting {
    /// Sets the sort key.
    ///
    /// With no explicit direction the current one flips, starting from
    /// ascending the first time.
    pub fn sort_by(&mut self, key: impl Into<String>, direction: Option<SortDirection>) {
        let direction = direction.unwrap_or(match self.direction {
            None => SortDirection::Ascending,
            Some(current) => current.toggled(),
        });
        self.key = Some(key.into());
        self.direction = Some(direction);
    }

    /// The configured sort key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The direction extraction uses.
    pub fn direction(&self) -> SortDirection {
        self.direction.unwrap_or_default()
    }
}
