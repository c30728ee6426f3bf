//! The chat engine.
//!
//! [`Chat`] owns the [`Directory`] and applies commands to it. It is a plain
//! struct mutated through `&mut self`; the daemon serializes access by
//! running it inside a single actor task (see [`crate::network::actor`]).

use tracing::{debug, info, warn};
use wschat_proto::UserInfo;

use crate::config::{AdminBlock, Config, LimitsConfig};
use crate::error::ChatError;
use crate::metrics;
use crate::sink::EventSink;
use crate::state::{Directory, SessionId};
use crate::validation::Validator;

pub(crate) fn unknown_session(id: SessionId) -> ChatError {
    ChatError::Internal(format!("unknown session {id}"))
}

/// In-memory chat state plus the rules that govern it.
#[derive(Debug)]
pub struct Chat {
    pub(crate) directory: Directory,
    pub(crate) motd: String,
    pub(crate) validator: Validator,
    admins: Vec<AdminBlock>,
}

impl Default for Chat {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MOTD, LimitsConfig::default(), Vec::new())
    }
}

impl Chat {
    pub fn new(motd: impl Into<String>, limits: LimitsConfig, admins: Vec<AdminBlock>) -> Self {
        Self {
            directory: Directory::new(),
            motd: motd.into(),
            validator: Validator::new(limits),
            admins,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.motd.load(), config.limits.clone(), config.admin.clone())
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn motd_text(&self) -> &str {
        &self.motd
    }

    /// Register a new session reachable through `sink`.
    ///
    /// Sessions whose url matches an `[[admin]]` mask start as admins.
    pub fn connect(&mut self, url: impl Into<String>, sink: Box<dyn EventSink>) -> SessionId {
        let url = url.into();
        let id = self.directory.connect(url.clone(), sink);
        info!(session = %id, url = %url, "Session connected");
        self.provision(id);
        self.update_gauges();
        id
    }

    /// Record the session's final url (reverse DNS answered or gave up) and
    /// send it its identity.
    pub fn identify(&mut self, id: SessionId, url: Option<String>) {
        if let Some(url) = url
            && let Some(session) = self.directory.session_mut(id)
        {
            debug!(session = %id, old = %session.url, new = %url, "Session url updated");
            session.url = url;
            self.provision(id);
        }
        if let Some(session) = self.directory.session(id) {
            session.sink().ident(&session.info());
        }
    }

    /// Leave every channel, then forget the session.
    pub fn disconnect(&mut self, id: SessionId, reason: &str) {
        let Some(session) = self.directory.session(id) else {
            return;
        };
        info!(session = %id, nick = session.display_nick(), url = %session.url, reason = %reason, "Session quitting");

        let farewell = format!("{} has left the building !", session.display_nick());
        let channels: Vec<String> = session.channels().map(str::to_string).collect();
        for channel in channels {
            self.part(id, &channel, Some(&farewell));
        }
        self.directory.remove_session(id);
        self.update_gauges();
    }

    /// Grant admin rights when the session url matches an admin block.
    fn provision(&mut self, id: SessionId) {
        let Some(session) = self.directory.session_mut(id) else {
            return;
        };
        if !session.options.admin && self.admins.iter().any(|block| block.matches(&session.url)) {
            session.options.admin = true;
            info!(session = %id, url = %session.url, "Admin rights granted by mask");
        }
    }

    /// Broadcast `leave` to the pre-removal members, then remove `id`.
    pub(crate) fn part(&mut self, id: SessionId, channel: &str, reason: Option<&str>) {
        let Some(user) = self.user_info(id) else {
            return;
        };
        let fanout = self
            .directory
            .broadcast(channel, |sink| sink.leave(&user, channel, reason));
        metrics::record_fanout(fanout);
        self.directory.remove_member(id, channel);
        debug!(session = %id, channel = %channel, "Left channel");
    }

    pub(crate) fn user_info(&self, id: SessionId) -> Option<UserInfo> {
        self.directory.session(id).map(|s| s.info())
    }

    /// Look up the requester. Commands from unknown sessions are dropped.
    pub(crate) fn requester(&self, id: SessionId) -> Result<&crate::state::Session, ChatError> {
        self.directory.session(id).ok_or_else(|| unknown_session(id))
    }

    /// Send an error event to the requester and count it.
    pub(crate) fn report(&self, id: SessionId, verb: &'static str, error: &ChatError) {
        metrics::record_command_error(verb, error.kind());
        match error.client_message() {
            Some(message) => {
                debug!(session = %id, command = verb, code = error.error_code(), error = %error, "Command rejected");
                self.directory.send_to(id, |sink| sink.error(&message));
            }
            None => warn!(session = %id, command = verb, code = error.error_code(), error = %error, "Command failed"),
        }
    }

    pub(crate) fn update_gauges(&self) {
        metrics::set_population(self.directory.session_count(), self.directory.channel_count());
    }
}
