//! User, member and channel option types as they appear on the wire.
//!
//! Updates are typed allow-lists: each `*Update` struct names exactly the
//! fields a client may change and rejects any other key at decode time.

use serde::{Deserialize, Deserializer, Serialize};

/// Server-wide flags of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModes {
    pub admin: bool,
    pub bot: bool,
}

impl UserModes {
    /// Apply the fields present in `update`.
    pub fn apply(&mut self, update: &UserModesUpdate) {
        if let Some(admin) = update.admin {
            self.admin = admin;
        }
        if let Some(bot) = update.bot {
            self.bot = bot;
        }
    }
}

/// Rights of one member within one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberModes {
    pub operator: bool,
    pub voiced: bool,
}

impl MemberModes {
    /// Rights of the member who creates a channel.
    pub fn founder() -> Self {
        Self {
            operator: true,
            voiced: true,
        }
    }

    /// Rights of a later joiner.
    pub fn joiner(moderated: bool) -> Self {
        Self {
            operator: false,
            voiced: !moderated,
        }
    }

    /// Apply the fields present in `update`.
    pub fn apply(&mut self, update: &MemberModesUpdate) {
        if let Some(operator) = update.operator {
            self.operator = operator;
        }
        if let Some(voiced) = update.voiced {
            self.voiced = voiced;
        }
    }
}

/// Public snapshot of a channel's options.
///
/// The channel password is never sent; only whether one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelModes {
    pub password: bool,
    pub moderated: bool,
    pub secret: bool,
    #[serde(rename = "topic")]
    pub topic_locked: bool,
}

/// Requested change to a channel's options.
///
/// `password` distinguishes an absent key (`None`) from a request to clear
/// the password (`Some(None)`, sent as `null` or `""`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelModesUpdate {
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
    #[serde(default)]
    pub moderated: Option<bool>,
    #[serde(default)]
    pub secret: Option<bool>,
    #[serde(default, rename = "topic")]
    pub topic_locked: Option<bool>,
}

/// Requested change to a member's channel rights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberModesUpdate {
    #[serde(default)]
    pub operator: Option<bool>,
    #[serde(default)]
    pub voiced: Option<bool>,
}

/// Requested change to a session's server-wide flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserModesUpdate {
    #[serde(default)]
    pub admin: Option<bool>,
    #[serde(default)]
    pub bot: Option<bool>,
}

/// Wire rendering of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub nick: String,
    pub url: String,
    pub options: UserModes,
}

/// Placeholder nick shown for sessions that have not chosen one.
pub const NO_NICK: &str = "(nonick)";

/// Combined flags of a listed user: server-wide flags plus, for channel
/// listings, the member's rights in that channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceModes {
    pub admin: bool,
    pub bot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voiced: Option<bool>,
}

impl PresenceModes {
    pub fn global(user: UserModes) -> Self {
        Self {
            admin: user.admin,
            bot: user.bot,
            operator: None,
            voiced: None,
        }
    }

    pub fn member(user: UserModes, member: MemberModes) -> Self {
        Self {
            admin: user.admin,
            bot: user.bot,
            operator: Some(member.operator),
            voiced: Some(member.voiced),
        }
    }
}

/// One entry of a `usermatch` reply: the user, its flags, and the channels
/// (with rights) the requester is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMatch(pub UserInfo, pub UserModes, pub Vec<(String, MemberModes)>);

/// Deserialize a field that is present, keeping `null` distinct from absent.
/// Empty strings count as `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Some(value.filter(|s| !s.is_empty())))
}
