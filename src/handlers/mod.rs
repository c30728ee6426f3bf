//! Command handlers.
//!
//! Each handler is a `Chat` method returning [`HandlerResult`]. Dispatch
//! wraps it in a `command` span and a [`CommandTimer`]; a returned error is
//! reported to the requester only. Handlers that act on several targets
//! report per-target failures themselves and keep going.

mod channel;
mod connection;
mod messaging;
mod mode;

use tracing::warn;
use wschat_proto::Command;

use crate::engine::Chat;
use crate::error::HandlerResult;
use crate::state::SessionId;
use crate::telemetry::{CommandTimer, spans};

impl Chat {
    /// Apply one decoded command on behalf of session `id`.
    pub fn handle(&mut self, id: SessionId, command: Command) {
        let verb = command.verb();
        let Some(session) = self.directory.session(id) else {
            warn!(session = %id, command = verb, "Command from unknown session dropped");
            return;
        };
        let span = spans::command(verb, &id.to_string(), session.nick.as_deref());
        let _enter = span.enter();
        let _timer = CommandTimer::new(verb);

        if let Err(error) = self.dispatch(id, command) {
            self.report(id, verb, &error);
        }
        self.update_gauges();
    }

    fn dispatch(&mut self, id: SessionId, command: Command) -> HandlerResult {
        match command {
            // Answered by the transport before reaching the engine.
            Command::Version { .. } => Ok(()),
            Command::Ident => self.ident(id),
            Command::Time => self.time(id),
            Command::Motd { value } => self.motd(id, value),
            Command::Nick { new } => self.nick(id, new),
            Command::List => self.list(id),
            Command::Users { channel } => self.users(id, channel.as_deref()),
            Command::UserMatch { pattern } => self.usermatch(id, &pattern),
            Command::Join { channel, password } => self.join(id, &channel, password.as_deref()),
            Command::Topic { channel, value } => self.topic(id, &channel, value),
            Command::Msg { channel, content } => self.msg(id, &channel, &content),
            Command::PrivMsg { user, content } => self.privmsg(id, &user, &content),
            Command::Leave { channel, reason } => self.leave(id, &channel, reason.as_deref()),
            Command::Kick {
                channel,
                user,
                reason,
            } => self.kick(id, &channel, &user, reason.as_deref()),
            Command::ChannelMode { channel, options } => {
                self.channel_mode(id, &channel, options.as_ref())
            }
            Command::ChannelUserMode {
                channel,
                user,
                options,
            } => self.channel_user_mode(id, &channel, &user, options.as_ref()),
            Command::UserMode { user, options } => self.user_mode(id, &user, options.as_ref()),
            Command::Wall { pattern, content } => self.wall(id, &pattern, &content),
        }
    }
}
