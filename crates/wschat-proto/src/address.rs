//! Address specs: how clients designate one or many users.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user designation.
///
/// On the wire this is either a bare string (an exact nickname) or an
/// object whose fields are glob patterns:
///
/// ```json
/// "alice"
/// {"nick": "bo*", "channel": "rust-*", "url": "*.example.net:*"}
/// ```
///
/// Absent pattern fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressSpec {
    /// Exact nickname; no glob interpretation.
    Nick(String),
    /// Field-by-field glob pattern.
    Pattern(UserPattern),
}

/// Glob fields of a structured address spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AddressSpec {
    /// A spec matching every session.
    pub fn everyone() -> Self {
        Self::Pattern(UserPattern::default())
    }

    /// Shorthand for a nick-only glob pattern.
    pub fn nick_pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(UserPattern {
            nick: Some(pattern.into()),
            ..Default::default()
        })
    }
}

impl Default for AddressSpec {
    fn default() -> Self {
        Self::everyone()
    }
}

impl From<&str> for AddressSpec {
    fn from(nick: &str) -> Self {
        Self::Nick(nick.to_string())
    }
}

/// Renders as `nick#channel@url`, omitting absent parts.
impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nick(nick) => f.write_str(nick),
            Self::Pattern(pattern) => {
                if let Some(nick) = &pattern.nick {
                    f.write_str(nick)?;
                }
                if let Some(channel) = &pattern.channel {
                    write!(f, "#{channel}")?;
                }
                if let Some(url) = &pattern.url {
                    write!(f, "@{url}")?;
                }
                Ok(())
            }
        }
    }
}
