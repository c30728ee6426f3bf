//! Network module.
//!
//! Contains the Gateway (WebSocket listener), the per-client Connection, the
//! engine actor they feed, and reverse DNS for session urls.

pub mod actor;
mod connection;
mod gateway;
mod resolve;

pub use actor::{EngineHandle, EngineRequest};
pub use connection::Connection;
pub use gateway::Gateway;
pub use resolve::HostnameResolver;
