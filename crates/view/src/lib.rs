//! Snapshot View - Filtered, sorted and paginated views over a record collection.
//!
//! This crate provides the per-session view state machine:
//!
//! - `View`: Configuration API, filter routing and emission
//! - `ViewState`: Page size, page number, sorting, group/range keys, delta mode
//! - `FilterDescriptor` / `FilterMode`: Filter requests and how they combine
//! - `DeltaEncoder`: Replaces already-sent records with their primary key
//! - `ContentUpdate` / `Statistics`: What a view emits
//!
//! # Example
//!
//! ```rust
//! use snapshot_core::{Record, Value};
//! use snapshot_view::{FilterDescriptor, FilterMode, LoadOptions, View};
//!
//! let records: Vec<Record> = ["Adam", "Masha", "Karl"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, name)| Record::from_iter([("id", Value::from(i as i64)), ("name", Value::from(*name))]))
//!     .collect();
//!
//! let mut view = View::new();
//! view.load_collection(records, LoadOptions::new().suppress_emit(true));
//! view.pause_emit();
//! view.apply_filter("name", FilterDescriptor::fuzzy("a"), FilterMode::Replace);
//! view.resume_emit(false);
//!
//! let update = view.refresh().unwrap();
//! assert_eq!(update.statistics.models.total, 3);
//! ```

mod delta;
mod filter;
mod loader;
mod pipeline;
mod sink;
mod sort;
mod state;
mod statistics;
mod view;

pub use delta::{DeltaEncoder, PageEntry};
pub use filter::{apply_filter, clear_filter, clear_filters, FilterDescriptor, FilterMode, FilterReport, KeyList};
pub use loader::LoadOptions;
pub use pipeline::ContentUpdate;
pub use sink::{ContentSink, DetachedSink};
pub use sort::{SortDirection, Sorting};
pub use state::{PageSize, ViewState};
pub use statistics::{GroupEntry, ModelStats, PageStats, RangeStats, SortStats, Statistics};
pub use view::View;
