//! Messaging commands: channel messages, private messages, wall.

use tracing::info;
use wschat_proto::AddressSpec;

use crate::engine::Chat;
use crate::error::{ChatError, HandlerResult};
use crate::metrics;
use crate::permission;
use crate::state::SessionId;

impl Chat {
    pub(super) fn msg(&mut self, id: SessionId, channel: &str, content: &str) -> HandlerResult {
        let session = self.requester(id)?;
        let (target, member) = self
            .directory
            .channel(channel)
            .and_then(|c| Some((c, c.member(id)?)))
            .ok_or_else(|| ChatError::NotOnChannel(channel.to_string()))?;
        permission::talk(session.options, member, &target.options)?;
        self.validator.message(content)?;

        let from = session.info();
        let fanout = self
            .directory
            .broadcast(channel, |sink| sink.msg(&from, channel, content));
        metrics::record_fanout(fanout);
        Ok(())
    }

    /// Deliver to exactly one session; the sender gets a copy.
    pub(super) fn privmsg(&mut self, id: SessionId, user: &AddressSpec, content: &str) -> HandlerResult {
        let session = self.requester(id)?;
        if session.nick.is_none() {
            return Err(ChatError::NickRequired);
        }
        self.validator.message(content)?;
        let dest = self.directory.resolve_one(user)?;

        let from = session.info();
        let Some(to) = self.user_info(dest) else {
            return Err(ChatError::UserNotFound(user.clone()));
        };
        session.sink().privmsg(&from, &to, content);
        if dest != id {
            self.directory.send_to(dest, |sink| sink.privmsg(&from, &to, content));
        }
        Ok(())
    }

    /// Admin broadcast to every session matching `pattern`.
    pub(super) fn wall(&mut self, id: SessionId, pattern: &AddressSpec, content: &str) -> HandlerResult {
        let session = self.requester(id)?;
        permission::require_admin(session.options)?;
        if session.nick.is_none() {
            return Err(ChatError::NickRequired);
        }
        self.validator.message(content)?;

        let from = session.info();
        let found = self.directory.find_sessions(pattern);
        for dest in &found {
            self.directory.send_to(*dest, |sink| sink.wall(&from, content));
        }
        metrics::record_fanout(found.len());
        info!(session = %id, nick = %from.nick, pattern = %pattern, recipients = found.len(), "Wall sent");
        Ok(())
    }
}
