//! Outbound content sinks.

use crate::pipeline::ContentUpdate;

/// Receives every update a view emits.
pub trait ContentSink {
    fn content_updated(&mut self, update: &ContentUpdate);
}

impl<F> ContentSink for F
where
    F: FnMut(&ContentUpdate),
{
    fn content_updated(&mut self, update: &ContentUpdate) {
        self(update)
    }
}

/// Sink of a view with no transport attached. Logs and drops every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedSink;

impl ContentSink for DetachedSink {
    fn content_updated(&mut self, update: &ContentUpdate) {
        tracing::warn!(
            models = update.statistics.models.current,
            "no transport attached, content update dropped"
        );
    }
}
