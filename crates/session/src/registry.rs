//! Session registry.
//!
//! `SessionRegistry` owns every open session, routes inbound events to them
//! and drives deferred indexing cooperatively through `tick`.

use crate::channel::Channel;
use crate::config::SessionConfig;
use crate::session::{Session, SessionId};
use crate::transport::Transport;
use hashbrown::HashMap;
use serde_json::Value as JsonValue;
use snapshot_core::Record;
use std::sync::Arc;

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a SessionId>) -> Vec<SessionId> {
    let mut ids: Vec<SessionId> = ids.copied().collect();
    ids.sort_unstable();
    ids
}

/// A registry of client sessions sharing one configuration.
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    config: SessionConfig,
    next_id: SessionId,
    /// Last session advanced by `tick`.
    last_ticked: Option<SessionId>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            next_id: 1,
            last_ticked: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Opens a session in the configured namespace.
    pub fn open(&mut self, transport: impl Transport + 'static) -> SessionId {
        let namespace = self.config.namespace.clone();
        self.open_in(&namespace, transport)
    }

    /// Opens a session in `namespace`.
    pub fn open_in(&mut self, namespace: &str, transport: impl Transport + 'static) -> SessionId {
        let id = self.next_id;
        self.next_id += 1;

        let channel = Channel::new(self.config.prefix.as_str(), namespace);
        let mut session = Session::new(id, channel, transport);
        self.config.apply(session.view_mut());
        tracing::info!(session = id, channel = %session.channel(), "session opened");

        self.sessions.insert(id, session);
        id
    }

    /// Closes a session. Returns true if it existed.
    pub fn close(&mut self, id: SessionId) -> bool {
        match self.sessions.remove(&id) {
            Some(session) => {
                tracing::info!(session = id, channel = %session.channel(), "session closed");
                true
            }
            None => false,
        }
    }

    /// Routes one inbound event to session `id`.
    pub fn dispatch(&mut self, id: SessionId, channel: &str, args: &[JsonValue]) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => session.handle(channel, args),
            None => {
                tracing::warn!(session = id, channel = %channel, "event for unknown session dropped");
                false
            }
        }
    }

    /// Loads `records` into session `id` with the configured load options.
    pub fn load_collection(&mut self, id: SessionId, records: impl Into<Arc<[Record]>>) -> bool {
        let options = self.config.load_options();
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.view_mut().load_collection(records, options);
                true
            }
            None => false,
        }
    }

    /// Loads `records` into every session of `namespace`. The records are
    /// shared, not copied. Returns the number of sessions loaded.
    pub fn broadcast_collection(&mut self, namespace: &str, records: impl Into<Arc<[Record]>>) -> usize {
        let records: Arc<[Record]> = records.into();
        let mut loaded = 0;
        for id in sorted_ids(self.sessions.keys()) {
            let options = self.config.load_options();
            if let Some(session) = self.sessions.get_mut(&id) {
                if session.channel().namespace() == namespace {
                    session.view_mut().load_collection(records.clone(), options);
                    loaded += 1;
                }
            }
        }
        loaded
    }

    /// Builds one pending dimension of one indexing session.
    ///
    /// Sessions take turns in id order. Returns true while any session is
    /// still indexing.
    pub fn tick(&mut self) -> bool {
        let indexing = sorted_ids(
            self.sessions
                .iter()
                .filter(|(_, s)| s.view().is_indexing())
                .map(|(id, _)| id),
        );
        let Some(&first) = indexing.first() else {
            return false;
        };
        let next = self
            .last_ticked
            .and_then(|last| indexing.iter().copied().find(|id| *id > last))
            .unwrap_or(first);
        self.last_ticked = Some(next);

        let mut more = indexing.len() > 1;
        if let Some(session) = self.sessions.get_mut(&next) {
            more |= session.view_mut().index_step();
        }
        more
    }

    /// Ticks until no session is indexing.
    pub fn drain(&mut self) {
        while self.tick() {}
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
