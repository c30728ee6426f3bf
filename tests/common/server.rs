//! Test server management.
//!
//! Runs the WebSocket gateway in-process on an ephemeral port.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use wschatd::Chat;
use wschatd::config::{ListenConfig, LimitsConfig};
use wschatd::network::{EngineHandle, Gateway};

/// A gateway plus engine running on tokio tasks.
pub struct TestServer {
    addr: SocketAddr,
    gateway: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with_origins(&[]).await
    }

    /// Spawn a server accepting only the given handshake origins.
    pub async fn spawn_with_origins(origins: &[&str]) -> anyhow::Result<Self> {
        let config = ListenConfig {
            address: "127.0.0.1:0".parse()?,
            allow_origins: origins.iter().map(|o| o.to_string()).collect(),
            resolve_hostnames: false,
        };
        let chat = Chat::new("Test Server", LimitsConfig::default(), Vec::new());
        let (engine, _engine_task) = EngineHandle::spawn(chat);
        let gateway = Gateway::bind(config, engine).await?;
        let addr = gateway.local_addr()?;
        let gateway = tokio::spawn(gateway.run());
        Ok(Self { addr, gateway })
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.gateway.abort();
    }
}

/// A raw WebSocket client speaking JSON frames.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, frame: Value) -> anyhow::Result<()> {
        self.send_raw(&frame.to_string()).await
    }

    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Next text frame, decoded as JSON.
    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        loop {
            let next = tokio::time::timeout(Duration::from_secs(5), self.stream.next()).await?;
            match next {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Read frames until one with `verb` arrives; returns it.
    pub async fn recv_verb(&mut self, verb: &str) -> anyhow::Result<Value> {
        loop {
            let frame = self.recv().await?;
            if frame[0] == verb {
                return Ok(frame);
            }
        }
    }

    pub async fn close(mut self) -> anyhow::Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
