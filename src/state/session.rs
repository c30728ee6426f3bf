//! Connected sessions.

use std::collections::BTreeSet;
use std::fmt;

use wschat_proto::{NO_NICK, UserInfo, UserModes};

use crate::sink::EventSink;

/// Opaque session handle, unique for the lifetime of a [`Directory`].
///
/// Displays as a 6-character base36 string (e.g. `AAAAAC`) in logs.
///
/// [`Directory`]: super::Directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub(super) fn new(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base36_encode_6(self.0))
    }
}

/// Encode a number as a 6-character base36 string.
fn base36_encode_6(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 6];

    for slot in result.iter_mut().rev() {
        *slot = CHARS[(n % 36) as usize];
        n /= 36;
    }

    String::from_utf8_lossy(&result).into_owned()
}

/// One connected client.
pub struct Session {
    pub id: SessionId,
    /// `host:port`, or `hostname:port` once reverse DNS has answered.
    pub url: String,
    /// Unset until the client picks one; not unique across sessions.
    pub nick: Option<String>,
    pub options: UserModes,
    /// Names of the channels this session belongs to. Mirrors
    /// `Channel::members`; only [`Directory`](super::Directory) mutates it.
    pub(super) channels: BTreeSet<String>,
    pub(super) sink: Box<dyn EventSink>,
}

impl Session {
    pub(super) fn new(id: SessionId, url: String, sink: Box<dyn EventSink>) -> Self {
        Self {
            id,
            url,
            nick: None,
            options: UserModes::default(),
            channels: BTreeSet::new(),
            sink,
        }
    }

    /// Wire rendering of this session.
    pub fn info(&self) -> UserInfo {
        UserInfo {
            nick: self.display_nick().to_string(),
            url: self.url.clone(),
            options: self.options,
        }
    }

    /// The nick, or the placeholder when none was chosen.
    pub fn display_nick(&self) -> &str {
        self.nick.as_deref().unwrap_or(NO_NICK)
    }

    pub fn is_admin(&self) -> bool {
        self.options.admin
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(String::as_str)
    }

    pub fn is_in(&self, channel: &str) -> bool {
        self.channels.contains(channel)
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("nick", &self.nick)
            .field("options", &self.options)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}
