//! Channel state.

use std::collections::BTreeMap;

use wschat_proto::{ChannelModes, ChannelModesUpdate, MemberModes};

use super::SessionId;

/// Stored channel options. Unlike [`ChannelModes`], this holds the password
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelOptions {
    pub password: Option<String>,
    pub moderated: bool,
    pub secret: bool,
    pub topic_locked: bool,
}

impl ChannelOptions {
    /// Snapshot safe to send to clients.
    pub fn view(&self) -> ChannelModes {
        ChannelModes {
            password: self.password.is_some(),
            moderated: self.moderated,
            secret: self.secret,
            topic_locked: self.topic_locked,
        }
    }

    /// Apply the fields present in `update`.
    pub fn apply(&mut self, update: &ChannelModesUpdate) {
        if let Some(password) = &update.password {
            self.password = password.clone();
        }
        if let Some(moderated) = update.moderated {
            self.moderated = moderated;
        }
        if let Some(secret) = update.secret {
            self.secret = secret;
        }
        if let Some(topic_locked) = update.topic_locked {
            self.topic_locked = topic_locked;
        }
    }

    /// Whether `password` opens this channel.
    pub fn admits(&self, password: Option<&str>) -> bool {
        match &self.password {
            None => true,
            Some(expected) => password == Some(expected.as_str()),
        }
    }
}

/// A live channel. Exists only while it has members.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub options: ChannelOptions,
    /// Mirrors `Session::channels`; only the directory mutates it.
    pub(super) members: BTreeMap<SessionId, MemberModes>,
}

impl Channel {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            topic: String::new(),
            options: ChannelOptions::default(),
            members: BTreeMap::new(),
        }
    }

    pub fn member(&self, id: SessionId) -> Option<MemberModes> {
        self.members.get(&id).copied()
    }

    pub fn member_mut(&mut self, id: SessionId) -> Option<&mut MemberModes> {
        self.members.get_mut(&id)
    }

    pub fn has_member(&self, id: SessionId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = (SessionId, MemberModes)> + '_ {
        self.members.iter().map(|(id, modes)| (*id, *modes))
    }

    pub fn member_ids(&self) -> Vec<SessionId> {
        self.members.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
