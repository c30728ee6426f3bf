//! Input length limits configuration.

use serde::Deserialize;

/// Maximum lengths, in characters, of client-supplied strings.
///
/// Values over the limit are rejected before any state changes.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum nickname length (default: 25).
    #[serde(default = "default_nick_len")]
    pub nick_len: usize,
    /// Maximum channel name length (default: 25).
    #[serde(default = "default_channel_len")]
    pub channel_len: usize,
    /// Maximum topic length (default: 200).
    #[serde(default = "default_topic_len")]
    pub topic_len: usize,
    /// Maximum channel or private message length (default: 1000).
    #[serde(default = "default_message_len")]
    pub message_len: usize,
    /// Maximum leave/kick reason length (default: 50).
    #[serde(default = "default_reason_len")]
    pub reason_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            nick_len: default_nick_len(),
            channel_len: default_channel_len(),
            topic_len: default_topic_len(),
            message_len: default_message_len(),
            reason_len: default_reason_len(),
        }
    }
}

fn default_nick_len() -> usize {
    25
}

fn default_channel_len() -> usize {
    25
}

fn default_topic_len() -> usize {
    200
}

fn default_message_len() -> usize {
    1000
}

fn default_reason_len() -> usize {
    50
}
