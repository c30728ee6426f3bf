//! Mode commands: channel options, member rights, user flags.
//!
//! All three accept patterns and act on every match. A target the requester
//! may not touch produces an error for that target only.

use tracing::info;
use wschat_proto::{AddressSpec, ChannelModesUpdate, MemberModesUpdate, UserModesUpdate};

use crate::engine::Chat;
use crate::error::{ChatError, HandlerResult};
use crate::metrics;
use crate::permission;
use crate::state::SessionId;

const VERB: &str = "mode";

impl Chat {
    /// Read or change the options of every visible channel matching `pattern`.
    pub(super) fn channel_mode(
        &mut self,
        id: SessionId,
        pattern: &str,
        options: Option<&ChannelModesUpdate>,
    ) -> HandlerResult {
        let actor = self.requester(id)?.options;
        let found: Vec<String> = self
            .directory
            .find_channels(pattern)
            .into_iter()
            .filter(|name| {
                self.directory
                    .channel(name)
                    .is_some_and(|c| permission::can_see_channel(actor, c.member(id), &c.options))
            })
            .collect();
        if found.is_empty() {
            return Err(ChatError::NoChannelMatch(pattern.to_string()));
        }

        for name in found {
            let Some(target) = self.directory.channel(&name) else {
                continue;
            };
            let Some(update) = options else {
                let view = target.options.view();
                self.directory.send_to(id, |sink| sink.channelmode(&name, &view));
                continue;
            };
            let member = target.member(id);
            if let Err(error) = permission::change_channel_modes(actor, member, &name) {
                self.report(id, VERB, &error);
                continue;
            }

            let Some(target) = self.directory.channel_mut(&name) else {
                continue;
            };
            target.options.apply(update);
            let view = target.options.view();
            info!(session = %id, channel = %name, modes = ?view, "Channel modes changed");

            let fanout = self.directory.broadcast(&name, |sink| sink.channelmode(&name, &view));
            metrics::record_fanout(fanout);
            if member.is_none() {
                self.directory.send_to(id, |sink| sink.channelmode(&name, &view));
            }
        }
        Ok(())
    }

    /// Read or change the rights of the members of `channel` matching `user`.
    pub(super) fn channel_user_mode(
        &mut self,
        id: SessionId,
        channel: &str,
        user: &AddressSpec,
        options: Option<&MemberModesUpdate>,
    ) -> HandlerResult {
        let session = self.requester(id)?;
        let actor = session.options;
        let target = self.visible_channel(session, channel)?;
        let member = target.member(id);
        permission::change_member_modes(actor, member)?;

        let found: Vec<SessionId> = self
            .directory
            .find_sessions(user)
            .into_iter()
            .filter(|v| target.has_member(*v))
            .collect();
        if found.is_empty() {
            return Err(ChatError::UserNotFound(user.clone()));
        }

        for victim in found {
            let Some(info) = self.user_info(victim) else {
                continue;
            };
            let Some(update) = options else {
                let modes = self.directory.channel(channel).and_then(|c| c.member(victim));
                let flags = self.directory.session(victim).map(|s| s.options);
                if let (Some(modes), Some(flags)) = (modes, flags) {
                    self.directory
                        .send_to(id, |sink| sink.chanusermode(channel, &info, &modes, Some(&flags)));
                }
                continue;
            };

            let Some(modes) = self
                .directory
                .channel_mut(channel)
                .and_then(|c| c.member_mut(victim))
            else {
                continue;
            };
            modes.apply(update);
            let modes = *modes;
            info!(session = %id, victim = %victim, nick = %info.nick, channel = %channel, operator = modes.operator, voiced = modes.voiced, "Member modes changed");

            let fanout = self
                .directory
                .broadcast(channel, |sink| sink.chanusermode(channel, &info, &modes, None));
            metrics::record_fanout(fanout);
            if member.is_none() {
                self.directory
                    .send_to(id, |sink| sink.chanusermode(channel, &info, &modes, None));
            }
        }
        Ok(())
    }

    /// Read or change the server-wide flags of every session matching `user`.
    pub(super) fn user_mode(
        &mut self,
        id: SessionId,
        user: &AddressSpec,
        options: Option<&UserModesUpdate>,
    ) -> HandlerResult {
        let actor = self.requester(id)?.options;
        let found = self.directory.find_sessions(user);
        if found.is_empty() {
            return Err(ChatError::UserNotFound(user.clone()));
        }
        if let Some(update) = options {
            permission::touch_admin_flag(actor, update)?;
        }

        for victim in found {
            let Some(update) = options else {
                if let Some(other) = self.directory.session(victim) {
                    let (info, flags) = (other.info(), other.options);
                    self.directory.send_to(id, |sink| sink.usermode(&info, &flags));
                }
                continue;
            };
            if let Err(error) = permission::set_bot_flag(actor, victim == id, update) {
                self.report(id, VERB, &error);
                continue;
            }

            let Some(other) = self.directory.session_mut(victim) else {
                continue;
            };
            other.options.apply(update);
            let (info, flags) = (other.info(), other.options);
            info!(session = %id, victim = %victim, nick = %info.nick, admin = flags.admin, bot = flags.bot, "User modes changed");

            self.directory.send_to(victim, |sink| sink.usermode(&info, &flags));
            if victim != id {
                self.directory.send_to(id, |sink| sink.usermode(&info, &flags));
            }
        }
        Ok(())
    }
}
