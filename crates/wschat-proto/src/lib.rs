//! # wschat-proto
//!
//! Wire protocol for the wschat WebSocket chat service.
//!
//! ## Features
//!
//! - Decoding of inbound `[verb, arguments]` frames into typed [`Command`]s
//! - Encoding of outbound [`Event`]s
//! - User, member and channel option types with allow-listed updates
//! - Address specs designating one or many users
//! - A shell-style [`glob`] matcher used for address patterns
//!
//! ## Quick Start
//!
//! ```rust
//! use wschat_proto::{Command, Event};
//!
//! let command: Command = r#"["join", {"channel": "general"}]"#.parse().unwrap();
//! assert_eq!(command.verb(), "join");
//!
//! let frame = Event::Motd { content: "hello".into() }.to_json();
//! assert_eq!(frame, r#"["motd",{"content":"hello"}]"#);
//! ```

#![deny(clippy::all)]

pub mod address;
pub mod command;
pub mod error;
pub mod event;
pub mod glob;
pub mod modes;

pub use address::{AddressSpec, UserPattern};
pub use command::Command;
pub use error::{ProtocolError, Result};
pub use event::Event;
pub use modes::{
    ChannelModes, ChannelModesUpdate, MemberModes, MemberModesUpdate, NO_NICK, PresenceModes,
    UserInfo, UserMatch, UserModes, UserModesUpdate,
};
