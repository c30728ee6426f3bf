//! Outbound events.
//!
//! Every event is sent as a JSON array `[verb, payload]`. Several event
//! kinds share a wire verb (`users`, `msg`, `mode`) and are told apart by
//! the payload keys.

use crate::address::AddressSpec;
use crate::modes::{ChannelModes, MemberModes, PresenceModes, UserInfo, UserMatch, UserModes};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::{Value, json};

/// Protocol name announced in the version handshake.
pub const PROTOCOL: &str = "ws";

/// Protocol version announced in the version handshake.
pub const VERSION: &str = "1.2";

/// A server-to-client event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Error { message: String },
    Version,
    Ident(UserInfo),
    Time { local: String },
    Motd { content: String },
    Nick { channel: Option<String>, old: UserInfo, new: UserInfo },
    List { channels: Vec<(String, ChannelModes)> },
    Users { channel: Option<String>, users: Vec<(UserInfo, PresenceModes)> },
    UserMatch { pattern: AddressSpec, matches: Vec<UserMatch> },
    Join { user: UserInfo, channel: String },
    Topic { channel: String, value: String },
    Msg { from: UserInfo, channel: String, content: String },
    PrivMsg { from: UserInfo, user: UserInfo, content: String },
    Leave { user: UserInfo, channel: String, reason: Option<String> },
    ChannelMode { channel: String, options: ChannelModes },
    /// `flags` is set on query replies, which also carry the member's
    /// server-wide flags; change broadcasts carry channel rights only.
    ChannelUserMode {
        channel: String,
        user: UserInfo,
        options: MemberModes,
        flags: Option<UserModes>,
    },
    UserMode { user: UserInfo, options: UserModes },
    Kick { user: UserInfo, channel: String, reason: Option<String> },
    Wall { from: UserInfo, content: String },
}

impl Event {
    /// Wire verb of this event.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Version => "version",
            Self::Ident(_) => "ident",
            Self::Time { .. } => "time",
            Self::Motd { .. } => "motd",
            Self::Nick { .. } => "nick",
            Self::List { .. } => "list",
            Self::Users { .. } | Self::UserMatch { .. } => "users",
            Self::Join { .. } => "join",
            Self::Topic { .. } => "topic",
            Self::Msg { .. } | Self::PrivMsg { .. } => "msg",
            Self::Leave { .. } => "leave",
            Self::ChannelMode { .. } | Self::ChannelUserMode { .. } | Self::UserMode { .. } => {
                "mode"
            }
            Self::Kick { .. } => "kick",
            Self::Wall { .. } => "wall",
        }
    }

    /// Second element of the wire frame.
    pub fn payload(&self) -> Value {
        match self {
            Self::Error { message } => json!({ "message": message }),
            Self::Version => json!({ "protocol": PROTOCOL, "version": VERSION }),
            Self::Ident(user) => json!(user),
            Self::Time { local } => json!({ "local": local }),
            Self::Motd { content } => json!({ "content": content }),
            Self::Nick { channel, old, new } => {
                with_optional(json!({ "old": old, "new": new }), "channel", channel.as_deref())
            }
            Self::List { channels } => json!({ "channels": channels }),
            Self::Users { channel, users } => {
                with_optional(json!({ "users": users }), "channel", channel.as_deref())
            }
            Self::UserMatch { pattern, matches } => json!({ "pattern": pattern, "match": matches }),
            Self::Join { user, channel } => json!({ "user": user, "channel": channel }),
            Self::Topic { channel, value } => json!({ "channel": channel, "value": value }),
            Self::Msg { from, channel, content } => {
                json!({ "from": from, "channel": channel, "content": content })
            }
            Self::PrivMsg { from, user, content } => {
                json!({ "from": from, "user": user, "content": content })
            }
            Self::Leave { user, channel, reason } => {
                with_optional(json!({ "user": user, "channel": channel }), "reason", reason.as_deref())
            }
            Self::ChannelMode { channel, options } => {
                json!({ "channel": channel, "options": options })
            }
            Self::ChannelUserMode { channel, user, options, flags } => {
                let mut options = json!(options);
                if let (Value::Object(map), Some(flags)) = (&mut options, flags) {
                    map.insert("admin".into(), Value::Bool(flags.admin));
                    map.insert("bot".into(), Value::Bool(flags.bot));
                }
                json!({ "channel": channel, "user": user, "options": options })
            }
            Self::UserMode { user, options } => json!({ "user": user, "options": options }),
            Self::Kick { user, channel, reason } => {
                with_optional(json!({ "user": user, "channel": channel }), "reason", reason.as_deref())
            }
            Self::Wall { from, content } => json!({ "from": from, "content": content }),
        }
    }

    /// Encode as a text frame.
    pub fn to_json(&self) -> String {
        // Serializing a verb and a Value cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Add `key` to an object payload only when `value` is present.
fn with_optional(mut payload: Value, key: &str, value: Option<&str>) -> Value {
    if let (Value::Object(map), Some(value)) = (&mut payload, value) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    payload
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut frame = serializer.serialize_tuple(2)?;
        frame.serialize_element(self.verb())?;
        frame.serialize_element(&self.payload())?;
        frame.end()
    }
}
