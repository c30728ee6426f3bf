//! Unified error handling for wschatd.
//!
//! Every command failure is a [`ChatError`]. Its `Display` text is the
//! message sent back to the requester in an `error` event, and its
//! [`ErrorKind`] labels the failure for metrics.

use thiserror::Error;
use wschat_proto::{AddressSpec, ProtocolError};

use crate::config::LimitsConfig;

/// Broad failure category of a [`ChatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed nick, channel name, topic, message or reason.
    Validation,
    /// The requester lacks the rights for the operation.
    Authorization,
    /// A channel or user spec designates nothing.
    NotFound,
    /// A spec designates several sessions where exactly one is needed.
    Ambiguous,
    /// The inbound frame could not be decoded.
    Protocol,
    /// Engine bookkeeping failure; never shown to clients.
    Internal,
}

impl ErrorKind {
    /// Static label for metrics.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Ambiguous => "ambiguous",
            Self::Protocol => "protocol",
            Self::Internal => "internal",
        }
    }
}

// ============================================================================
// Command errors
// ============================================================================

/// Errors that can occur while handling a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("invalid nick (max {0} letters, does not contain whitespace nor @ # & !)")]
    InvalidNick(usize),

    #[error("invalid name for a channel (max {0} letters, does not contain whitespace nor @ # & !)")]
    InvalidChannel(usize),

    #[error("invalid topic (max {0} letters)")]
    InvalidTopic(usize),

    #[error("invalid message (max {0} characters)")]
    InvalidMessage(usize),

    #[error("invalid reason (max {0} characters)")]
    InvalidReason(usize),

    #[error("please choose your nickname first")]
    NickRequired,

    #[error("channel {0} already joined")]
    AlreadyJoined(String),

    #[error("a password is required to join channel {0}")]
    PasswordRequired(String),

    #[error("not participating in channel {0}")]
    NotOnChannel(String),

    #[error("you are not allowed to modify server motd")]
    MotdDenied,

    #[error("insufficient privileges")]
    InsufficientPrivileges,

    #[error("you are not allowed to modify channel topic")]
    TopicDenied,

    #[error("you are not allowed to talk")]
    CannotTalk,

    #[error("you are not allowed to change modes for channel {0}")]
    ChannelModeDenied(String),

    #[error("you are not allowed to change user modes on this channel")]
    MemberModeDenied,

    #[error("you cannot make other people feel like a bot !")]
    BotDenied,

    #[error("you have no right to kick {user} out of {channel}")]
    KickDenied { user: AddressSpec, channel: String },

    #[error("user {0} not found")]
    UserNotFound(AddressSpec),

    #[error("multiple users matching {0}")]
    Ambiguous(AddressSpec),

    #[error("no channel matching {0}")]
    NoChannelMatch(String),

    #[error("channel {0} does not exist")]
    NoSuchChannel(String),

    #[error("user {user} is not guilty of anything in channel {channel}")]
    NotGuilty { user: AddressSpec, channel: String },

    #[error("unrecognized protocol version")]
    UnknownVersion,

    #[error("protocol error")]
    Protocol,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNick(_)
            | Self::InvalidChannel(_)
            | Self::InvalidTopic(_)
            | Self::InvalidMessage(_)
            | Self::InvalidReason(_) => ErrorKind::Validation,
            Self::NickRequired
            | Self::AlreadyJoined(_)
            | Self::PasswordRequired(_)
            | Self::NotOnChannel(_)
            | Self::MotdDenied
            | Self::InsufficientPrivileges
            | Self::TopicDenied
            | Self::CannotTalk
            | Self::ChannelModeDenied(_)
            | Self::MemberModeDenied
            | Self::BotDenied
            | Self::KickDenied { .. } => ErrorKind::Authorization,
            Self::UserNotFound(_)
            | Self::NoChannelMatch(_)
            | Self::NoSuchChannel(_)
            | Self::NotGuilty { .. } => ErrorKind::NotFound,
            Self::Ambiguous(_) => ErrorKind::Ambiguous,
            Self::UnknownVersion | Self::Protocol => ErrorKind::Protocol,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidNick(_) => "invalid_nick",
            Self::InvalidChannel(_) => "invalid_channel",
            Self::InvalidTopic(_) => "invalid_topic",
            Self::InvalidMessage(_) => "invalid_message",
            Self::InvalidReason(_) => "invalid_reason",
            Self::NickRequired => "nick_required",
            Self::AlreadyJoined(_) => "already_joined",
            Self::PasswordRequired(_) => "password_required",
            Self::NotOnChannel(_) => "not_on_channel",
            Self::MotdDenied => "motd_denied",
            Self::InsufficientPrivileges => "insufficient_privileges",
            Self::TopicDenied => "topic_denied",
            Self::CannotTalk => "cannot_talk",
            Self::ChannelModeDenied(_) => "channel_mode_denied",
            Self::MemberModeDenied => "member_mode_denied",
            Self::BotDenied => "bot_denied",
            Self::KickDenied { .. } => "kick_denied",
            Self::UserNotFound(_) => "user_not_found",
            Self::Ambiguous(_) => "ambiguous_target",
            Self::NoChannelMatch(_) => "no_channel_match",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NotGuilty { .. } => "not_guilty",
            Self::UnknownVersion => "unknown_version",
            Self::Protocol => "protocol_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Text of the `error` event sent to the requester, if any.
    ///
    /// Internal errors stay in the logs.
    pub fn client_message(&self) -> Option<String> {
        match self {
            Self::Internal(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn invalid_nick(limits: &LimitsConfig) -> Self {
        Self::InvalidNick(limits.nick_len)
    }

    pub fn invalid_channel(limits: &LimitsConfig) -> Self {
        Self::InvalidChannel(limits.channel_len)
    }
}

impl From<ProtocolError> for ChatError {
    fn from(_: ProtocolError) -> Self {
        Self::Protocol
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), ChatError>;
