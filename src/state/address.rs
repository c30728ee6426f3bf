//! Address resolution: from a user spec to concrete sessions.

use wschat_proto::{AddressSpec, UserPattern, glob};

use super::{Directory, Session, SessionId};
use crate::error::ChatError;

/// Whether `session` is designated by `spec`.
///
/// A bare nick must equal the session's nick exactly. Pattern fields are
/// globs; an absent field always passes, an unset nick matches as `""`, and
/// the channel field passes when any membership matches.
pub fn session_matches(session: &Session, spec: &AddressSpec) -> bool {
    match spec {
        AddressSpec::Nick(nick) => session.nick.as_deref() == Some(nick.as_str()),
        AddressSpec::Pattern(pattern) => pattern_matches(session, pattern),
    }
}

fn pattern_matches(session: &Session, pattern: &UserPattern) -> bool {
    let nick_ok = pattern
        .nick
        .as_deref()
        .is_none_or(|p| glob::matches(session.nick.as_deref().unwrap_or(""), p));
    let channel_ok = pattern
        .channel
        .as_deref()
        .is_none_or(|p| session.channels().any(|c| glob::matches(c, p)));
    let url_ok = pattern
        .url
        .as_deref()
        .is_none_or(|p| glob::matches(&session.url, p));
    nick_ok && channel_ok && url_ok
}

impl Directory {
    /// All sessions designated by `spec`, in connection order.
    pub fn find_sessions(&self, spec: &AddressSpec) -> Vec<SessionId> {
        self.sessions()
            .filter(|session| session_matches(session, spec))
            .map(|session| session.id)
            .collect()
    }

    /// Names of all live channels matching the glob `pattern`.
    pub fn find_channels(&self, pattern: &str) -> Vec<String> {
        self.channels()
            .filter(|channel| glob::matches(&channel.name, pattern))
            .map(|channel| channel.name.clone())
            .collect()
    }

    /// The single session designated by `spec`.
    pub fn resolve_one(&self, spec: &AddressSpec) -> Result<SessionId, ChatError> {
        match self.find_sessions(spec).as_slice() {
            [] => Err(ChatError::UserNotFound(spec.clone())),
            [id] => Ok(*id),
            _ => Err(ChatError::Ambiguous(spec.clone())),
        }
    }
}
