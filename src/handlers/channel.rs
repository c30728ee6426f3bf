//! Channel commands: list, users, join, topic, leave, kick.

use tracing::info;
use wschat_proto::{AddressSpec, ChannelModes, MemberModes, PresenceModes, UserMatch};

use crate::engine::Chat;
use crate::error::{ChatError, HandlerResult};
use crate::metrics;
use crate::permission;
use crate::state::{Channel, Session, SessionId};

impl Chat {
    /// The channel named `name`, unless it is missing or hidden from `session`.
    pub(super) fn visible_channel(&self, session: &Session, name: &str) -> Result<&Channel, ChatError> {
        self.directory
            .channel(name)
            .filter(|c| permission::can_see_channel(session.options, c.member(session.id), &c.options))
            .ok_or_else(|| ChatError::NoSuchChannel(name.to_string()))
    }

    pub(super) fn list(&mut self, id: SessionId) -> HandlerResult {
        let session = self.requester(id)?;
        let channels: Vec<(String, ChannelModes)> = self
            .directory
            .channels()
            .filter(|c| permission::can_see_channel(session.options, c.member(id), &c.options))
            .map(|c| (c.name.clone(), c.options.view()))
            .collect();
        session.sink().list(&channels);
        Ok(())
    }

    /// Members of one channel, or (admins only) every connected session.
    pub(super) fn users(&mut self, id: SessionId, channel: Option<&str>) -> HandlerResult {
        let session = self.requester(id)?;
        let Some(name) = channel else {
            permission::require_admin(session.options)?;
            let users: Vec<_> = self
                .directory
                .sessions()
                .map(|s| (s.info(), PresenceModes::global(s.options)))
                .collect();
            session.sink().users(None, &users);
            return Ok(());
        };

        let target = self.visible_channel(session, name)?;
        let users: Vec<_> = target
            .members()
            .filter_map(|(member, modes)| {
                self.directory
                    .session(member)
                    .map(|s| (s.info(), PresenceModes::member(s.options, modes)))
            })
            .collect();
        session.sink().users(Some(name), &users);
        Ok(())
    }

    /// Sessions matching `pattern`, with the channels the requester shares
    /// with them. Non-admins only see sessions they share a channel with.
    pub(super) fn usermatch(&mut self, id: SessionId, pattern: &AddressSpec) -> HandlerResult {
        let session = self.requester(id)?;
        let admin = session.is_admin();

        let mut matches = Vec::new();
        for found in self.directory.find_sessions(pattern) {
            let Some(other) = self.directory.session(found) else {
                continue;
            };
            let channels: Vec<(String, MemberModes)> = other
                .channels()
                .filter(|name| admin || session.is_in(name))
                .filter_map(|name| {
                    let modes = self.directory.channel(name)?.member(found)?;
                    Some((name.to_string(), modes))
                })
                .collect();
            if admin || !channels.is_empty() {
                matches.push(UserMatch(other.info(), other.options, channels));
            }
        }
        session.sink().usermatch(pattern, &matches);
        Ok(())
    }

    /// Join or create `channel`; the joiner then gets the member list and
    /// the topic.
    pub(super) fn join(&mut self, id: SessionId, channel: &str, password: Option<&str>) -> HandlerResult {
        self.validator.channel(channel)?;
        let session = self.requester(id)?;
        if session.nick.is_none() {
            return Err(ChatError::NickRequired);
        }
        if session.is_in(channel) {
            return Err(ChatError::AlreadyJoined(channel.to_string()));
        }
        if let Some(existing) = self.directory.channel(channel) {
            permission::join(session.options, channel, &existing.options, password)?;
        }

        let user = session.info();
        let modes = self
            .directory
            .add_member(id, channel)
            .ok_or_else(|| ChatError::Internal(format!("{id} could not join {channel}")))?;
        info!(session = %id, nick = %user.nick, channel = %channel, operator = modes.operator, "Joined channel");

        let fanout = self.directory.broadcast(channel, |sink| sink.join(&user, channel));
        metrics::record_fanout(fanout);

        self.users(id, Some(channel))?;
        self.topic(id, channel, None)
    }

    /// Read the topic, or set it and tell every member.
    pub(super) fn topic(&mut self, id: SessionId, channel: &str, value: Option<String>) -> HandlerResult {
        let session = self.requester(id)?;
        let target = self.visible_channel(session, channel)?;
        let Some(value) = value else {
            session.sink().topic(channel, &target.topic);
            return Ok(());
        };

        let member = target.member(id);
        if member.is_none() && !session.is_admin() {
            return Err(ChatError::NotOnChannel(channel.to_string()));
        }
        permission::set_topic(session.options, member, &target.options)?;
        self.validator.topic(&value)?;
        info!(session = %id, nick = session.display_nick(), channel = %channel, "Topic changed");

        if let Some(target) = self.directory.channel_mut(channel) {
            target.topic = value.clone();
        }
        let fanout = self.directory.broadcast(channel, |sink| sink.topic(channel, &value));
        metrics::record_fanout(fanout);
        if member.is_none() {
            self.directory.send_to(id, |sink| sink.topic(channel, &value));
        }
        Ok(())
    }

    pub(super) fn leave(&mut self, id: SessionId, channel: &str, reason: Option<&str>) -> HandlerResult {
        let session = self.requester(id)?;
        if !session.is_in(channel) {
            return Err(ChatError::NotOnChannel(channel.to_string()));
        }
        self.validator.reason(reason)?;
        self.part(id, channel, reason);
        Ok(())
    }

    /// Remove every member of `channel` designated by `victim`.
    pub(super) fn kick(
        &mut self,
        id: SessionId,
        channel: &str,
        victim: &AddressSpec,
        reason: Option<&str>,
    ) -> HandlerResult {
        let actor = self.requester(id)?.options;
        let member = self.directory.channel(channel).and_then(|c| c.member(id));
        if member.is_none() && !actor.admin {
            return Err(ChatError::NotOnChannel(channel.to_string()));
        }
        if self.directory.channel(channel).is_none() {
            return Err(ChatError::NoSuchChannel(channel.to_string()));
        }
        permission::kick(actor, member, victim, channel)?;
        self.validator.reason(reason)?;

        let found = self.directory.find_sessions(victim);
        if found.is_empty() {
            return Err(ChatError::UserNotFound(victim.clone()));
        }
        let guilty: Vec<SessionId> = found
            .into_iter()
            .filter(|v| self.directory.session(*v).is_some_and(|s| s.is_in(channel)))
            .collect();
        if guilty.is_empty() {
            return Err(ChatError::NotGuilty {
                user: victim.clone(),
                channel: channel.to_string(),
            });
        }

        for kicked in guilty {
            let Some(user) = self.user_info(kicked) else {
                continue;
            };
            let fanout = self
                .directory
                .broadcast(channel, |sink| sink.kick(&user, channel, reason));
            metrics::record_fanout(fanout);
            let actor_present = self.directory.session(id).is_some_and(|s| s.is_in(channel));
            if !actor_present {
                self.directory.send_to(id, |sink| sink.kick(&user, channel, reason));
            }
            self.directory.remove_member(kicked, channel);
            info!(session = %id, victim = %kicked, nick = %user.nick, channel = %channel, "Kicked from channel");
        }
        Ok(())
    }
}
