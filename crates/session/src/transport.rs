//! Outbound transport seam.

use crate::channel::Channel;
use crate::convert::update_to_json;
use crate::message::CONTENT_UPDATED;
use serde_json::Value as JsonValue;
use snapshot_view::{ContentSink, ContentUpdate};

/// Delivers named events to one connected client.
pub trait Transport {
    /// Sends `payload` (the event's argument list) on `channel`.
    fn emit(&mut self, channel: &str, payload: JsonValue);
}

impl<F> Transport for F
where
    F: FnMut(&str, JsonValue),
{
    fn emit(&mut self, channel: &str, payload: JsonValue) {
        self(channel, payload)
    }
}

/// Adapts a `Transport` into the content sink of a view.
pub struct TransportSink<T> {
    channel: String,
    transport: T,
}

impl<T: Transport> TransportSink<T> {
    pub fn new(channel: &Channel, transport: T) -> Self {
        Self {
            channel: channel.event(CONTENT_UPDATED),
            transport,
        }
    }
}

impl<T: Transport> ContentSink for TransportSink<T> {
    fn content_updated(&mut self, update: &ContentUpdate) {
        match update_to_json(update) {
            Ok(payload) => self.transport.emit(&self.channel, payload),
            Err(err) => {
                tracing::error!(channel = %self.channel, error = %err, "failed to encode content update")
            }
        }
    }
}
