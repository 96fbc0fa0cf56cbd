//! Snapshot Index - Per-field dimensions over an in-memory record collection.
//!
//! This crate provides the indexed collection a snapshot view reads from:
//!
//! - `IndexCollection`: A shared record array plus one `Dimension` per field
//! - `DimensionRef`: Ordered top/bottom extraction, group counts, min/max
//! - `DimensionMut`: Exact, range and predicate filters, stacked or replaced
//! - `KeyRange`: Ordered key intervals used by exact and range filters
//!
//! Every extraction observes the filters of every dimension.
//!
//! # Example
//!
//! ```rust
//! use snapshot_core::{Record, Value};
//! use snapshot_index::{IndexCollection, KeyRange};
//!
//! let records: Vec<Record> = (1..=6)
//!     .map(|id| Record::from_iter([("id", Value::from(id))]))
//!     .collect();
//!
//! let mut collection = IndexCollection::new(records);
//! collection.add_dimension("id");
//!
//! collection
//!     .dimension_mut("id")
//!     .unwrap()
//!     .filter_range(KeyRange::inclusive(Value::from(2), Value::from(4)));
//!
//! let top = collection.dimension("id").unwrap().top(None);
//! let ids: Vec<i64> = top.iter().filter_map(|r| r.get("id")?.as_i64()).collect();
//! assert_eq!(ids, vec![4, 3, 2]);
//! ```

#![no_std]

extern crate alloc;

pub mod collection;
mod dimension;
pub mod group;
pub mod traits;

pub use collection::{DimensionMut, DimensionRef, IndexCollection};
pub use group::GroupCount;
pub use traits::{DimensionFilter, KeyRange, ValuePredicate};
