//! Snapshot Session - channel protocol and session arena for snapshot views.
//!
//! Each connected client gets a `Session` holding its own `View`. Inbound
//! events arrive on `<prefix>/<namespace>/<event>` channels with a positional
//! JSON argument list. Pages leave on `<prefix>/<namespace>/contentUpdated`
//! as a `[page, statistics]` pair.
//!
//! # Events
//!
//! - `perPage(n)`, `pageNumber(n)`, `sortBy(key, direction?)`
//! - `exactFilter`, `fuzzyFilter`, `patternFilter`, `rangeFilter`,
//!   `inSetFilter`, `notInSetFilter` taking `(keys, argument, mode?)`
//! - `clearFilter(key)`, `clearFilters()`
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value as JsonValue};
//! use snapshot_core::{Record, Value};
//! use snapshot_session::{SessionConfig, SessionRegistry};
//!
//! let mut registry = SessionRegistry::new(SessionConfig::default());
//! let id = registry.open(|channel: &str, payload: JsonValue| {
//!     assert_eq!(channel, "snapshot/default/contentUpdated");
//!     assert!(payload[0].is_array());
//! });
//!
//! let records: Vec<Record> = (1..=10)
//!     .map(|i| Record::from_iter([("id", Value::from(i))]))
//!     .collect();
//! registry.load_collection(id, records);
//! registry.dispatch(id, "snapshot/default/perPage", &[json!(3)]);
//! ```

pub mod channel;
pub mod config;
pub mod convert;
pub mod message;
mod registry;
mod session;
pub mod transport;

pub use channel::Channel;
pub use config::{SessionConfig, SortConfig};
pub use message::{Inbound, CONTENT_UPDATED};
pub use registry::SessionRegistry;
pub use session::{Session, SessionId};
pub use transport::{Transport, TransportSink};
