//! The directory of sessions and channels.
//!
//! Membership is stored twice: in `Session::channels` and in
//! `Channel::members`. Every mutation goes through [`Directory::add_member`]
//! or [`Directory::remove_member`], which update both sides and drop a
//! channel the moment its last member goes.

use std::collections::BTreeMap;

use tracing::debug;
use wschat_proto::MemberModes;

use super::{Channel, Session, SessionId};
use crate::sink::EventSink;

/// Owner of every [`Session`] and [`Channel`].
#[derive(Debug, Default)]
pub struct Directory {
    sessions: BTreeMap<SessionId, Session>,
    channels: BTreeMap<String, Channel>,
    next_id: u64,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session with no nick and no memberships.
    pub fn connect(&mut self, url: String, sink: Box<dyn EventSink>) -> SessionId {
        self.next_id += 1;
        let id = SessionId::new(self.next_id);
        self.sessions.insert(id, Session::new(id, url, sink));
        id
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Add `id` to `name`, creating the channel if needed.
    ///
    /// The creator becomes operator; later joiners are voiced unless the
    /// channel is moderated. Returns `None` for an unknown session or an
    /// existing membership.
    pub fn add_member(&mut self, id: SessionId, name: &str) -> Option<MemberModes> {
        let session = self.sessions.get_mut(&id)?;
        if !session.channels.insert(name.to_string()) {
            return None;
        }

        let channel = self.channels.entry(name.to_string()).or_insert_with(|| {
            debug!(channel = %name, "Channel created");
            Channel::new(name.to_string())
        });
        let modes = if channel.is_empty() {
            MemberModes::founder()
        } else {
            MemberModes::joiner(channel.options.moderated)
        };
        channel.members.insert(id, modes);
        Some(modes)
    }

    /// Remove `id` from `name`, dropping the channel once empty.
    pub fn remove_member(&mut self, id: SessionId, name: &str) -> Option<MemberModes> {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.channels.remove(name);
        }

        let channel = self.channels.get_mut(name)?;
        let modes = channel.members.remove(&id);
        if channel.is_empty() {
            self.channels.remove(name);
            debug!(channel = %name, "Channel destroyed");
        }
        modes
    }

    /// Unregister a session, silently dropping any membership it still holds.
    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        let names: Vec<String> = self.sessions.get(&id)?.channels.iter().cloned().collect();
        for name in names {
            self.remove_member(id, &name);
        }
        self.sessions.remove(&id)
    }

    /// Deliver to one session, if it still exists.
    pub fn send_to(&self, id: SessionId, deliver: impl FnOnce(&dyn EventSink)) {
        if let Some(session) = self.sessions.get(&id) {
            deliver(session.sink());
        }
    }

    /// Deliver to every member of `channel`. Returns the recipient count.
    pub fn broadcast(&self, channel: &str, deliver: impl Fn(&dyn EventSink)) -> usize {
        let Some(channel) = self.channels.get(channel) else {
            return 0;
        };
        let mut count = 0;
        for id in channel.members.keys() {
            if let Some(session) = self.sessions.get(id) {
                deliver(session.sink());
                count += 1;
            }
        }
        count
    }

    /// Deliver to every connected session. Returns the recipient count.
    pub fn broadcast_all(&self, deliver: impl Fn(&dyn EventSink)) -> usize {
        for session in self.sessions.values() {
            deliver(session.sink());
        }
        self.sessions.len()
    }

    /// Check that both membership views agree and that no channel is empty.
    pub fn is_consistent(&self) -> bool {
        let channels_ok = self.channels.iter().all(|(name, channel)| {
            !channel.is_empty()
                && channel.name == *name
                && channel
                    .members
                    .keys()
                    .all(|id| self.sessions.get(id).is_some_and(|s| s.channels.contains(name)))
        });
        let sessions_ok = self.sessions.values().all(|session| {
            session.channels.iter().all(|name| {
                self.channels
                    .get(name)
                    .is_some_and(|c| c.members.contains_key(&session.id))
            })
        });
        channels_ok && sessions_ok
    }
}
