//! Input shape checks for client-supplied strings.

use crate::config::LimitsConfig;
use crate::error::ChatError;

/// Characters a nick or channel name may not contain (besides whitespace).
const RESERVED_NAME_CHARS: [char; 4] = ['@', '#', '&', '!'];

/// Line-breaking control characters refused in free text.
const LINE_BREAKS: [char; 4] = ['\x0c', '\n', '\r', '\x0b'];

fn is_valid_name(name: &str, max_len: usize) -> bool {
    !name.is_empty()
        && name.chars().count() <= max_len
        && !name
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_NAME_CHARS.contains(&c))
}

fn is_valid_text(text: &str, max_len: usize) -> bool {
    !text.is_empty() && text.chars().count() <= max_len && !text.contains(LINE_BREAKS)
}

/// Validates nicks, channel names and free text against configured limits.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    pub fn nick(&self, nick: &str) -> Result<(), ChatError> {
        if is_valid_name(nick, self.limits.nick_len) {
            Ok(())
        } else {
            Err(ChatError::invalid_nick(&self.limits))
        }
    }

    pub fn channel(&self, channel: &str) -> Result<(), ChatError> {
        if is_valid_name(channel, self.limits.channel_len) {
            Ok(())
        } else {
            Err(ChatError::invalid_channel(&self.limits))
        }
    }

    pub fn topic(&self, topic: &str) -> Result<(), ChatError> {
        if is_valid_text(topic, self.limits.topic_len) {
            Ok(())
        } else {
            Err(ChatError::InvalidTopic(self.limits.topic_len))
        }
    }

    pub fn message(&self, message: &str) -> Result<(), ChatError> {
        if is_valid_text(message, self.limits.message_len) {
            Ok(())
        } else {
            Err(ChatError::InvalidMessage(self.limits.message_len))
        }
    }

    /// Reasons are optional; an absent reason is always valid.
    pub fn reason(&self, reason: Option<&str>) -> Result<(), ChatError> {
        match reason {
            Some(reason) if !is_valid_text(reason, self.limits.reason_len) => {
                Err(ChatError::InvalidReason(self.limits.reason_len))
            }
            _ => Ok(()),
        }
    }
}
