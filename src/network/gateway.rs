//! Gateway - WebSocket listener that accepts incoming connections.
//!
//! The Gateway binds a TCP socket, performs the WebSocket handshake with an
//! origin check, and spawns a [`Connection`] task per client.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tracing::{error, info, instrument, warn};

use super::actor::EngineHandle;
use super::connection::Connection;
use super::resolve::HostnameResolver;
use crate::config::ListenConfig;
use crate::metrics;

/// The Gateway accepts incoming WebSocket connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    config: Arc<ListenConfig>,
    engine: EngineHandle,
    resolver: Option<HostnameResolver>,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(config: ListenConfig, engine: EngineHandle) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.address).await?;
        info!(address = %listener.local_addr()?, "WebSocket listener bound");
        let resolver = config.resolve_hostnames.then(HostnameResolver::new);
        Ok(Self {
            listener,
            config: Arc::new(config),
            engine,
            resolver,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "WebSocket connection attempt");
                    metrics::record_connection();

                    let config = Arc::clone(&self.config);
                    let engine = self.engine.clone();
                    let resolver = self.resolver.clone();

                    tokio::spawn(async move {
                        // Origin validation callback for the WebSocket handshake
                        let origin_check = |req: &Request, response: Response| {
                            let origin = req
                                .headers()
                                .get("Origin")
                                .and_then(|o| o.to_str().ok());
                            if config.origin_allowed(origin) {
                                return Ok(response);
                            }
                            warn!(%addr, origin = ?origin, "WebSocket origin rejected");
                            let mut rejection = ErrorResponse::new(Some("origin not allowed".to_string()));
                            *rejection.status_mut() = StatusCode::FORBIDDEN;
                            Err(rejection)
                        };

                        match accept_hdr_async(stream, origin_check).await {
                            Ok(ws_stream) => {
                                info!(%addr, "WebSocket handshake successful");
                                let connection = Connection::new(ws_stream, addr, engine, resolver);
                                if let Err(e) = connection.run().await {
                                    error!(%addr, error = %e, "WebSocket connection error");
                                }
                                info!(%addr, "WebSocket connection closed");
                            }
                            Err(e) => {
                                warn!(%addr, error = %e, "WebSocket handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept WebSocket connection");
                }
            }
        }
    }
}
