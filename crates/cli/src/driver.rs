//! Line protocol between stdio and the session registry.

use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use snapshot_core::Record;
use snapshot_session::{SessionConfig, SessionId, SessionRegistry};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

/// One inbound line.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Command {
    session: u64,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    args: Vec<JsonValue>,
    #[serde(default)]
    close: bool,
}

/// One outbound line.
#[derive(Serialize)]
struct Event<'a> {
    session: u64,
    channel: &'a str,
    payload: &'a JsonValue,
}

pub struct Driver<W: Write + 'static = io::Stdout> {
    registry: SessionRegistry,
    collection: Option<Arc<[Record]>>,
    /// Client id to session id.
    clients: HashMap<u64, SessionId>,
    output: Rc<RefCell<W>>,
}

impl Driver<io::Stdout> {
    pub fn new(config: SessionConfig, collection: Option<Arc<[Record]>>) -> Self {
        Self::with_output(config, collection, Rc::new(RefCell::new(io::stdout())))
    }
}

impl<W: Write + 'static> Driver<W> {
    pub fn with_output(config: SessionConfig, collection: Option<Arc<[Record]>>, output: Rc<RefCell<W>>) -> Self {
        Self {
            registry: SessionRegistry::new(config),
            collection,
            clients: HashMap::new(),
            output,
        }
    }

    /// Parses and executes one command line.
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        let command: Command = serde_json::from_str(line).context("malformed command")?;

        if command.close {
            match self.clients.remove(&command.session) {
                Some(id) => {
                    self.registry.close(id);
                }
                None => bail!("session {} is not open", command.session),
            }
            return Ok(());
        }

        let Some(channel) = command.channel.as_deref() else {
            bail!("command for session {} has no channel", command.session);
        };
        let id = self.session(command.session);
        self.registry.dispatch(id, channel, &command.args);
        Ok(())
    }

    pub fn tick(&mut self) -> bool {
        self.registry.tick()
    }

    pub fn drain(&mut self) {
        self.registry.drain();
    }

    fn session(&mut self, client: u64) -> SessionId {
        if let Some(id) = self.clients.get(&client) {
            return *id;
        }
        let output = self.output.clone();
        let id = self.registry.open(move |channel: &str, payload: JsonValue| {
            let event = Event {
                session: client,
                channel,
                payload: &payload,
            };
            if let Err(err) = write_line(&mut *output.borrow_mut(), &event) {
                tracing::error!(session = client, error = %err, "failed to write event");
            }
        });
        self.clients.insert(client, id);
        if let Some(collection) = &self.collection {
            self.registry.load_collection(id, collection.clone());
        }
        id
    }
}

fn write_line(output: &mut impl Write, event: &Event<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *output, event)?;
    output.write_all(b"\n")?;
    output.flush()
}
