//! Emission pipeline.
//!
//! Derives the current page and its statistics from a `ViewState` and the
//! loaded `IndexCollection`. Irregular input (unknown sort key, empty set,
//! out-of-range page number) is normalized, never raised.

use crate::delta::{full_page, PageEntry};
use crate::state::{PageSize, ViewState};
use crate::statistics::{self, ModelStats, PageStats, SortStats, Statistics};
use serde::Serialize;
use snapshot_core::{Error, Record};
use snapshot_index::IndexCollection;
use std::time::Instant;

/// One outgoing update: a page plus its statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentUpdate {
    pub page: Vec<PageEntry>,
    pub statistics: Statistics,
}

/// Runs the pipeline once. `started` marks the start of the timed work.
pub(crate) fn run(state: &mut ViewState, collection: &IndexCollection, started: Instant) -> ContentUpdate {
    let direction = state.sorting.direction();
    let (sort_key, ordered) = extract(state, collection, direction.is_ascending());

    let model_count = ordered.len();
    state.last_page_number = state.per_page.page_count(model_count);

    if state.page_number > state.last_page_number {
        tracing::debug!(
            requested = state.page_number,
            last = state.last_page_number,
            "page number clamped"
        );
        state.page_number = state.last_page_number;
    }

    let (start, end) = state.per_page.bounds(state.page_number, model_count);
    let slice = &ordered[start..end];

    let page = match (state.delta_enabled, state.primary_key.as_deref()) {
        (true, Some(primary_key)) => state.delta.encode(slice, primary_key),
        _ => full_page(slice),
    };

    let per_page = match state.per_page {
        PageSize::Fixed(n) if n > 0 => n,
        PageSize::Fixed(_) => page.len(),
        PageSize::Unbounded => model_count,
    };

    let statistics = Statistics {
        pages: PageStats {
            total: state.last_page_number,
            current: state.page_number,
            per_page,
        },
        models: ModelStats {
            total: model_count,
            current: page.len(),
        },
        sort: SortStats {
            key: sort_key,
            direction,
        },
        ranges: statistics::ranges(collection, state.ranges.iter()),
        groups: statistics::groups(collection, state.groups.iter()),
        response_time: started.elapsed().as_secs_f64() * 1000.0,
    };

    ContentUpdate { page, statistics }
}

/// Orders the filtered set by the sort key, falling back to the primary key
/// and then to collection order.
fn extract<'c>(
    state: &ViewState,
    collection: &'c IndexCollection,
    ascending: bool,
) -> (Option<String>, Vec<&'c Record>) {
    let candidates = [state.sorting.key(), state.primary_key.as_deref()];
    for key in candidates.into_iter().flatten() {
        match collection.dimension(key) {
            Some(dimension) => {
                let ordered = if ascending {
                    dimension.bottom(None)
                } else {
                    dimension.top(None)
                };
                return (Some(key.to_string()), ordered);
            }
            None => {
                let err = Error::unknown_dimension(key);
                tracing::warn!(key = %key, error = %err, "sort key skipped");
            }
        }
    }

    let mut ordered = collection.filtered();
    if !ascending {
        ordered.reverse();
    }
    (None, ordered)
}
