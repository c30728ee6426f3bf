//! State management module.
//!
//! The [`Directory`] owns every session and channel; address resolution
//! lives alongside it in `address`.

mod address;
mod channel;
mod directory;
mod session;

pub use address::session_matches;
pub use channel::{Channel, ChannelOptions};
pub use directory::Directory;
pub use session::{Session, SessionId};
