//! wschatd - real-time multi-user chat over WebSocket.
//!
//! Clients connect, pick a nickname, join channels, exchange channel and
//! private messages, and administer channel and user rights. All state is
//! in memory and owned by a single [`Chat`] engine.
//!
//! ## Layout
//!
//! - [`state`]: sessions, channels and the [`state::Directory`] that owns them
//! - [`permission`]: authorization rules
//! - [`engine`] and `handlers`: command processing
//! - [`sink`]: the per-session event interface
//! - [`network`]: WebSocket gateway, connections and the engine actor

pub mod config;
pub mod engine;
pub mod error;
mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod permission;
pub mod sink;
pub mod state;
pub mod telemetry;
pub mod validation;

pub use engine::Chat;
pub use error::{ChatError, ErrorKind};
pub use sink::{EventQueue, EventSink};
pub use state::SessionId;
