//! One connected client and its view.

use crate::channel::Channel;
use crate::message::Inbound;
use crate::transport::{Transport, TransportSink};
use serde_json::Value as JsonValue;
use snapshot_core::Error;
use snapshot_view::View;

/// Unique identifier for a session.
pub type SessionId = u64;

/// A client session: its channel scope and its private view.
pub struct Session {
    id: SessionId,
    channel: Channel,
    view: View,
}

impl Session {
    /// Creates a session whose view emits through `transport`.
    pub fn new(id: SessionId, channel: Channel, transport: impl Transport + 'static) -> Self {
        let view = View::with_sink(TransportSink::new(&channel, transport));
        Self { id, channel, view }
    }

    /// Creates a session with no transport attached.
    pub fn detached(id: SessionId, channel: Channel) -> Self {
        Self {
            id,
            channel,
            view: View::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Handles one inbound event.
    ///
    /// Events for another prefix or namespace are ignored. Malformed
    /// messages are logged and dropped. Returns true if the event was applied.
    pub fn handle(&mut self, channel: &str, args: &[JsonValue]) -> bool {
        let Some(event) = self.channel.parse(channel) else {
            tracing::debug!(session = self.id, channel = %channel, "event for another scope ignored");
            return false;
        };
        match Inbound::decode(event, args) {
            Ok(message) => {
                self.apply(message);
                true
            }
            Err(Error::UnknownEvent { .. }) => {
                tracing::warn!(session = self.id, channel = %channel, "unknown event");
                false
            }
            Err(err) => {
                tracing::warn!(session = self.id, channel = %channel, error = %err, "message dropped");
                false
            }
        }
    }

    /// Applies a decoded message to the view.
    pub fn apply(&mut self, message: Inbound) {
        let view = &mut self.view;
        match message {
            Inbound::PerPage(Some(per_page)) => {
                view.set_per_page(per_page);
                view.refresh();
            }
            Inbound::PerPage(None) => {
                view.set_per_page_unbounded();
                view.refresh();
            }
            Inbound::PageNumber(page_number) => {
                if view.set_page_number(page_number) {
                    view.refresh();
                }
            }
            Inbound::SortBy { key, direction } => {
                view.set_sort_by(key, direction);
                view.refresh();
            }
            Inbound::ClearFilter(key) => {
                view.clear_filter(&key);
            }
            Inbound::ClearFilters => view.clear_filters(),
            Inbound::Filter {
                keys,
                descriptor,
                mode,
            } => {
                view.apply_filter(keys, descriptor, mode);
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("view", &self.view)
            .finish()
    }
}
