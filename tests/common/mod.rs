//! Integration test common infrastructure.
//!
//! [`TestChat`] drives a [`wschatd::Chat`] engine directly; each
//! [`TestClient`] is a session whose events land in an in-memory queue.
//! [`TestServer`] runs the full WebSocket gateway on an ephemeral port.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{TestChat, TestClient};
#[allow(unused_imports)]
pub use server::{TestServer, WsClient};
