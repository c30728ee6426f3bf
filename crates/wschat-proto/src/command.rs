//! Inbound commands.
//!
//! A frame is a JSON array `[verb, arguments]`; verbs without arguments may
//! omit the second element.

use crate::address::AddressSpec;
use crate::error::{ProtocolError, Result};
use crate::modes::{ChannelModesUpdate, MemberModesUpdate, UserModesUpdate};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake; answered by the transport, never by the engine.
    Version { protocol: String, version: String },
    Ident,
    Time,
    Motd { value: Option<String> },
    Nick { new: String },
    List,
    Users { channel: Option<String> },
    UserMatch { pattern: AddressSpec },
    Join { channel: String, password: Option<String> },
    Topic { channel: String, value: Option<String> },
    Msg { channel: String, content: String },
    PrivMsg { user: AddressSpec, content: String },
    Leave { channel: String, reason: Option<String> },
    Kick { channel: String, user: AddressSpec, reason: Option<String> },
    ChannelMode { channel: String, options: Option<ChannelModesUpdate> },
    ChannelUserMode { channel: String, user: AddressSpec, options: Option<MemberModesUpdate> },
    UserMode { user: AddressSpec, options: Option<UserModesUpdate> },
    Wall { pattern: AddressSpec, content: String },
}

impl Command {
    /// Wire verb, also used as the metrics label.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Version { .. } => "version",
            Self::Ident => "ident",
            Self::Time => "time",
            Self::Motd { .. } => "motd",
            Self::Nick { .. } => "nick",
            Self::List => "list",
            Self::Users { .. } | Self::UserMatch { .. } => "users",
            Self::Join { .. } => "join",
            Self::Topic { .. } => "topic",
            Self::Msg { .. } | Self::PrivMsg { .. } => "msg",
            Self::Leave { .. } => "leave",
            Self::Kick { .. } => "kick",
            Self::ChannelMode { .. } | Self::ChannelUserMode { .. } | Self::UserMode { .. } => {
                "mode"
            }
            Self::Wall { .. } => "wall",
        }
    }
}

#[derive(Deserialize)]
struct VersionArgs {
    protocol: String,
    version: String,
}

#[derive(Deserialize, Default)]
struct MotdArgs {
    value: Option<String>,
}

#[derive(Deserialize)]
struct NickArgs {
    new: String,
}

#[derive(Deserialize, Default)]
struct UsersArgs {
    channel: Option<String>,
    pattern: Option<AddressSpec>,
}

#[derive(Deserialize)]
struct JoinArgs {
    channel: String,
    password: Option<String>,
}

#[derive(Deserialize)]
struct TopicArgs {
    channel: String,
    value: Option<String>,
}

#[derive(Deserialize)]
struct MsgArgs {
    channel: Option<String>,
    user: Option<AddressSpec>,
    content: String,
}

#[derive(Deserialize)]
struct LeaveArgs {
    channel: String,
    reason: Option<String>,
}

#[derive(Deserialize)]
struct KickArgs {
    channel: String,
    user: AddressSpec,
    reason: Option<String>,
}

#[derive(Deserialize)]
struct ModeArgs {
    channel: Option<String>,
    user: Option<AddressSpec>,
    options: Option<Value>,
}

#[derive(Deserialize)]
struct WallArgs {
    #[serde(alias = "pattern")]
    user: AddressSpec,
    content: String,
}

/// Decode required arguments.
fn args<T: DeserializeOwned>(payload: Value) -> Result<T> {
    Ok(serde_json::from_value(payload)?)
}

/// Decode optional arguments; a missing or `null` payload yields the default.
fn optional_args<T: DeserializeOwned + Default>(payload: Value) -> Result<T> {
    if payload.is_null() {
        Ok(T::default())
    } else {
        args(payload)
    }
}

fn options<T: DeserializeOwned>(options: Option<Value>) -> Result<Option<T>> {
    match options {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(frame: &str) -> Result<Self> {
        let Value::Array(mut parts) = serde_json::from_str::<Value>(frame)? else {
            return Err(ProtocolError::NotAnArray);
        };
        if parts.is_empty() {
            return Err(ProtocolError::NotAnArray);
        }
        let payload = if parts.len() > 1 {
            parts.swap_remove(1)
        } else {
            Value::Null
        };
        let Value::String(verb) = parts.swap_remove(0) else {
            return Err(ProtocolError::VerbNotString);
        };

        let command = match verb.as_str() {
            "version" => {
                let VersionArgs { protocol, version } = args(payload)?;
                Self::Version { protocol, version }
            }
            "ident" => Self::Ident,
            "time" => Self::Time,
            "motd" => {
                let MotdArgs { value } = optional_args(payload)?;
                Self::Motd { value }
            }
            "nick" => {
                let NickArgs { new } = args(payload)?;
                Self::Nick { new }
            }
            "list" => Self::List,
            "users" => match optional_args::<UsersArgs>(payload)? {
                UsersArgs { pattern: Some(pattern), .. } => Self::UserMatch { pattern },
                UsersArgs { channel, .. } => Self::Users { channel },
            },
            "join" => {
                let JoinArgs { channel, password } = args(payload)?;
                Self::Join { channel, password }
            }
            "topic" => {
                let TopicArgs { channel, value } = args(payload)?;
                Self::Topic { channel, value }
            }
            "msg" => match args::<MsgArgs>(payload)? {
                MsgArgs { channel: Some(channel), content, .. } => Self::Msg { channel, content },
                MsgArgs { user: Some(user), content, .. } => Self::PrivMsg { user, content },
                _ => return Err(ProtocolError::MissingTarget("msg")),
            },
            "leave" => {
                let LeaveArgs { channel, reason } = args(payload)?;
                Self::Leave { channel, reason }
            }
            "kick" => {
                let KickArgs { channel, user, reason } = args(payload)?;
                Self::Kick { channel, user, reason }
            }
            "mode" => {
                let ModeArgs { channel, user, options: raw } = args(payload)?;
                match (channel, user) {
                    (Some(channel), Some(user)) => Self::ChannelUserMode {
                        channel,
                        user,
                        options: options(raw)?,
                    },
                    (Some(channel), None) => Self::ChannelMode {
                        channel,
                        options: options(raw)?,
                    },
                    (None, Some(user)) => Self::UserMode {
                        user,
                        options: options(raw)?,
                    },
                    (None, None) => return Err(ProtocolError::MissingTarget("mode")),
                }
            }
            "wall" => {
                let WallArgs { user, content } = args(payload)?;
                Self::Wall { pattern: user, content }
            }
            _ => return Err(ProtocolError::UnknownVerb(verb)),
        };

        Ok(command)
    }
}
