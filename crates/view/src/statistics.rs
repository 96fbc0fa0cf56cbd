//! Statistics envelope sent with every page.

use crate::sort::SortDirection;
use serde::Serialize;
use snapshot_core::{Error, Result, Value};
use snapshot_index::{GroupCount, IndexCollection};
use std::collections::BTreeMap;

/// Page counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    /// Number of pages (`lastPageNumber`).
    pub total: usize,
    /// Current 1-based page number.
    pub current: usize,
    /// Configured page size, or the page length when unpaged.
    pub per_page: usize,
}

/// Record counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    /// Records in the filtered set.
    pub total: usize,
    /// Records on this page.
    pub current: usize,
}

/// Sort state in effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortStats {
    pub key: Option<String>,
    pub direction: SortDirection,
}

/// Smallest and largest value of a dimension over the filtered set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeStats {
    pub min: Value,
    pub max: Value,
}

impl RangeStats {
    /// The range reported for a dimension with no selected records.
    pub fn unbounded() -> Self {
        Self {
            min: Value::Float64(f64::NEG_INFINITY),
            max: Value::Float64(f64::INFINITY),
        }
    }
}

/// Count of filtered records sharing one value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupEntry {
    pub key: Value,
    pub count: usize,
}

impl From<GroupCount> for GroupEntry {
    fn from(group: GroupCount) -> Self {
        Self {
            key: group.key,
            count: group.count,
        }
    }
}

/// Statistics of one emission.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub pages: PageStats,
    pub models: ModelStats,
    pub sort: SortStats,
    pub ranges: BTreeMap<String, RangeStats>,
    pub groups: BTreeMap<String, Vec<GroupEntry>>,
    /// Milliseconds spent producing the emission.
    pub response_time: f64,
}

/// Min/max per range key. Unknown keys are logged and left out.
pub(crate) fn ranges<'k>(
    collection: &IndexCollection,
    keys: impl IntoIterator<Item = &'k str>,
) -> BTreeMap<String, RangeStats> {
    let mut out = BTreeMap::new();
    for key in keys {
        match range_of(collection, key) {
            Ok(range) => {
                out.insert(key.to_string(), range);
            }
            Err(err) => tracing::warn!(key = %key, error = %err, "range key skipped"),
        }
    }
    out
}

fn range_of(collection: &IndexCollection, key: &str) -> Result<RangeStats> {
    let dimension = collection
        .dimension(key)
        .ok_or_else(|| Error::unknown_dimension(key))?;
    Ok(match (dimension.min(), dimension.max()) {
        (Some(min), Some(max)) => RangeStats {
            min: min.clone(),
            max: max.clone(),
        },
        _ => RangeStats::unbounded(),
    })
}

/// Value counts per group key. Unknown keys are logged and left out.
pub(crate) fn groups<'k>(
    collection: &IndexCollection,
    keys: impl IntoIterator<Item = &'k str>,
) -> BTreeMap<String, Vec<GroupEntry>> {
    let mut out = BTreeMap::new();
    for key in keys {
        match collection.dimension(key) {
            Some(dimension) => {
                let entries = dimension.group_all().into_iter().map(GroupEntry::from).collect();
                out.insert(key.to_string(), entries);
            }
            None => {
                let err = Error::unknown_dimension(key);
                tracing::warn!(key = %key, error = %err, "group key skipped");
            }
        }
    }
    out
}
