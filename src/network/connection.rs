//! One WebSocket client.
//!
//! The reader loop decodes frames and forwards commands to the engine; a
//! writer task drains the session's [`EventQueue`] onto the socket.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{Instrument, debug, info};
use wschat_proto::event::{PROTOCOL, VERSION};
use wschat_proto::{Command, Event};

use super::actor::EngineHandle;
use super::resolve::HostnameResolver;
use crate::error::ChatError;
use crate::metrics;
use crate::sink::EventQueue;
use crate::state::SessionId;
use crate::telemetry::spans;

/// A WebSocket connection handler.
pub struct Connection {
    stream: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    engine: EngineHandle,
    resolver: Option<HostnameResolver>,
}

impl Connection {
    pub fn new(
        stream: WebSocketStream<TcpStream>,
        addr: SocketAddr,
        engine: EngineHandle,
        resolver: Option<HostnameResolver>,
    ) -> Self {
        Self {
            stream,
            addr,
            engine,
            resolver,
        }
    }

    /// Run the connection until the peer goes away.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            stream,
            addr,
            engine,
            resolver,
        } = self;

        let (queue, mut events) = EventQueue::new();
        queue.send(Event::Version);
        let Some(id) = engine.connect(addr.to_string(), Box::new(queue.clone())).await else {
            anyhow::bail!("chat engine is not running");
        };
        engine.command(id, Command::Motd { value: None }).await;

        let identify = engine.clone();
        tokio::spawn(async move {
            let url = match resolver {
                Some(resolver) => resolver.session_url(addr).await,
                None => None,
            };
            identify.identify(id, url).await;
        });

        let (mut write, mut read) = stream.split();
        let writer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Err(e) = write.send(Message::Text(event.to_json())).await {
                    debug!(error = %e, "Write failed");
                    break;
                }
            }
            let _ = write.close().await;
        });

        let span = spans::connection(&id.to_string(), &addr.to_string());
        let reason = async {
            loop {
                match read.next().await {
                    Some(Ok(Message::Text(text))) => on_frame(&engine, id, &queue, &text).await,
                    Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                        Ok(text) => on_frame(&engine, id, &queue, &text).await,
                        Err(_) => protocol_error(&queue, "binary frame is not UTF-8"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        break frame
                            .map(|f| f.reason.to_string())
                            .filter(|r| !r.is_empty())
                            .unwrap_or_else(|| "connection closed".to_string());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => break e.to_string(),
                    None => break "connection closed".to_string(),
                }
            }
        }
        .instrument(span)
        .await;

        info!(session = %id, reason = %reason, "Client disconnected");
        engine.disconnect(id, reason).await;
        drop(queue);
        writer.await?;
        Ok(())
    }
}

/// Decode one text frame and route it.
async fn on_frame(engine: &EngineHandle, id: SessionId, queue: &EventQueue, text: &str) {
    debug!(session = %id, frame = %text, "Received frame");
    match text.parse::<Command>() {
        Ok(Command::Version { protocol, version }) => {
            if protocol == PROTOCOL && version == VERSION {
                queue.send(Event::Version);
            } else {
                queue.send(Event::Error {
                    message: ChatError::UnknownVersion.to_string(),
                });
            }
        }
        Ok(command) => engine.command(id, command).await,
        Err(e) => protocol_error(queue, &e.to_string()),
    }
}

fn protocol_error(queue: &EventQueue, detail: &str) {
    debug!(detail = %detail, "Undecodable frame");
    metrics::record_protocol_error();
    queue.send(Event::Error {
        message: ChatError::Protocol.to_string(),
    });
}
