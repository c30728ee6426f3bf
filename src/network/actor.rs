//! Engine actor.
//!
//! A single task owns the [`Chat`] and applies requests one at a time, in
//! arrival order. Connections talk to it through a cloneable
//! [`EngineHandle`].

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use wschat_proto::Command;

use crate::engine::Chat;
use crate::sink::EventSink;
use crate::state::SessionId;

/// Requests accepted by the engine actor.
pub enum EngineRequest {
    /// Register a session; the new id is sent back on `reply_tx`.
    Connect {
        url: String,
        sink: Box<dyn EventSink>,
        reply_tx: oneshot::Sender<SessionId>,
    },
    /// Reverse DNS finished (`url` is `None` when it found nothing).
    Identify { id: SessionId, url: Option<String> },
    /// A decoded client command.
    Command { id: SessionId, command: Command },
    /// The connection closed.
    Disconnect { id: SessionId, reason: String },
}

/// Sending side of the engine actor.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

/// Queue depth between connections and the engine.
const REQUEST_QUEUE: usize = 1024;

impl EngineHandle {
    /// Spawn the actor owning `chat`.
    ///
    /// The actor stops once every handle has been dropped.
    pub fn spawn(chat: Chat) -> (Self, JoinHandle<Chat>) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        let task = tokio::spawn(run(chat, rx));
        (Self { tx }, task)
    }

    /// Register a session. Returns `None` if the engine has stopped.
    pub async fn connect(&self, url: String, sink: Box<dyn EventSink>) -> Option<SessionId> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Connect { url, sink, reply_tx })
            .await
            .ok()?;
        reply_rx.await.ok()
    }

    pub async fn identify(&self, id: SessionId, url: Option<String>) {
        let _ = self.tx.send(EngineRequest::Identify { id, url }).await;
    }

    pub async fn command(&self, id: SessionId, command: Command) {
        let _ = self.tx.send(EngineRequest::Command { id, command }).await;
    }

    pub async fn disconnect(&self, id: SessionId, reason: String) {
        let _ = self.tx.send(EngineRequest::Disconnect { id, reason }).await;
    }
}

/// The main actor loop. Returns the final state once all handles are gone.
async fn run(mut chat: Chat, mut rx: mpsc::Receiver<EngineRequest>) -> Chat {
    info!("Chat engine started");
    while let Some(request) = rx.recv().await {
        match request {
            EngineRequest::Connect { url, sink, reply_tx } => {
                let id = chat.connect(url, sink);
                if reply_tx.send(id).is_err() {
                    debug!(session = %id, "Connection gone before registration completed");
                    chat.disconnect(id, "connection lost");
                }
            }
            EngineRequest::Identify { id, url } => chat.identify(id, url),
            EngineRequest::Command { id, command } => chat.handle(id, command),
            EngineRequest::Disconnect { id, reason } => chat.disconnect(id, &reason),
        }
    }
    info!("Chat engine stopped");
    chat
}
