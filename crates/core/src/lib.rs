//! Snapshot Core - Scalar values and records for snapshot views.
//!
//! This crate provides the foundational types shared by every snapshot crate:
//!
//! - `Value`: A scalar field value with a total order across types
//! - `Record`: An ordered mapping of field names to values
//! - `Error`: Error types raised by views and sessions
//!
//! # Example
//!
//! ```rust
//! use snapshot_core::{Record, Value};
//!
//! let record = Record::from_iter([("id", Value::from(1)), ("name", Value::from("Adam"))]);
//!
//! assert_eq!(record.get("name").and_then(Value::as_str), Some("Adam"));
//! assert!(record.get_or_null("age").is_null());
//! assert_eq!(record.keys().next(), Some("id"));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod record;
mod value;

pub use error::{Error, Result};
pub use record::{Record, RecordIndex};
pub use value::Value;
