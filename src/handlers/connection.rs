//! Session-level commands: ident, time, motd, nick.

use chrono::Local;
use tracing::info;

use crate::engine::{Chat, unknown_session};
use crate::error::HandlerResult;
use crate::metrics;
use crate::permission;
use crate::state::SessionId;

/// `Sat Oct 17 2026 14:03:27 GMT+0200`
const TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Render the server's local time.
pub(crate) fn local_time() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

impl Chat {
    pub(super) fn ident(&mut self, id: SessionId) -> HandlerResult {
        let session = self.requester(id)?;
        session.sink().ident(&session.info());
        Ok(())
    }

    pub(super) fn time(&mut self, id: SessionId) -> HandlerResult {
        let session = self.requester(id)?;
        session.sink().time(&local_time());
        Ok(())
    }

    /// Read the motd, or (admins only) replace it and push it to everyone.
    pub(super) fn motd(&mut self, id: SessionId, value: Option<String>) -> HandlerResult {
        let session = self.requester(id)?;
        let Some(value) = value else {
            session.sink().motd(&self.motd);
            return Ok(());
        };

        permission::set_motd(session.options)?;
        info!(session = %id, nick = session.display_nick(), "Message of the day changed");
        self.motd = value;
        let fanout = self.directory.broadcast_all(|sink| sink.motd(&self.motd));
        metrics::record_fanout(fanout);
        Ok(())
    }

    /// Rename; the session hears it once, then every channel it sits in.
    pub(super) fn nick(&mut self, id: SessionId, new: String) -> HandlerResult {
        self.validator.nick(&new)?;
        let session = self
            .directory
            .session_mut(id)
            .ok_or_else(|| unknown_session(id))?;

        let old = session.info();
        info!(session = %id, old = %old.nick, new = %new, "Nick changed");
        session.nick = Some(new);
        let renamed = session.info();
        let channels: Vec<String> = session.channels().map(str::to_string).collect();

        session.sink().nick(&renamed, &old, None);
        for channel in &channels {
            let fanout = self
                .directory
                .broadcast(channel, |sink| sink.nick(&renamed, &old, Some(channel.as_str())));
            metrics::record_fanout(fanout);
        }
        Ok(())
    }
}
