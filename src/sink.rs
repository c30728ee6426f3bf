//! Event delivery to sessions.
//!
//! The engine never talks to sockets. Each session carries an [`EventSink`]
//! with one method per event kind; the transport implements it with an
//! [`EventQueue`] drained by the connection's writer task.

use tokio::sync::mpsc;
use wschat_proto::{
    AddressSpec, ChannelModes, Event, MemberModes, PresenceModes, UserInfo, UserMatch, UserModes,
};

/// Outbound capability of a session.
///
/// Implementations must not block and must not fail; a closed peer simply
/// drops the event.
pub trait EventSink: Send {
    fn error(&self, message: &str);
    fn ident(&self, user: &UserInfo);
    fn time(&self, local: &str);
    fn motd(&self, content: &str);
    /// `channel` is `None` for the copy sent to the renamed session itself.
    fn nick(&self, new: &UserInfo, old: &UserInfo, channel: Option<&str>);
    fn list(&self, channels: &[(String, ChannelModes)]);
    /// `channel` is `None` for the admin-only global listing.
    fn users(&self, channel: Option<&str>, users: &[(UserInfo, PresenceModes)]);
    fn usermatch(&self, pattern: &AddressSpec, matches: &[UserMatch]);
    fn join(&self, user: &UserInfo, channel: &str);
    fn topic(&self, channel: &str, value: &str);
    fn msg(&self, from: &UserInfo, channel: &str, content: &str);
    fn privmsg(&self, from: &UserInfo, user: &UserInfo, content: &str);
    fn leave(&self, user: &UserInfo, channel: &str, reason: Option<&str>);
    fn channelmode(&self, channel: &str, options: &ChannelModes);
    /// `flags` accompanies query replies only.
    fn chanusermode(&self, channel: &str, user: &UserInfo, options: &MemberModes, flags: Option<&UserModes>);
    fn usermode(&self, user: &UserInfo, options: &UserModes);
    fn kick(&self, user: &UserInfo, channel: &str, reason: Option<&str>);
    fn wall(&self, from: &UserInfo, content: &str);
}

/// Sink that queues wire [`Event`]s on an unbounded channel.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventQueue {
    /// Create a queue and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an event. Dropped silently once the receiver is gone.
    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl EventSink for EventQueue {
    fn error(&self, message: &str) {
        self.send(Event::Error {
            message: message.to_string(),
        });
    }

    fn ident(&self, user: &UserInfo) {
        self.send(Event::Ident(user.clone()));
    }

    fn time(&self, local: &str) {
        self.send(Event::Time {
            local: local.to_string(),
        });
    }

    fn motd(&self, content: &str) {
        self.send(Event::Motd {
            content: content.to_string(),
        });
    }

    fn nick(&self, new: &UserInfo, old: &UserInfo, channel: Option<&str>) {
        self.send(Event::Nick {
            channel: channel.map(str::to_string),
            old: old.clone(),
            new: new.clone(),
        });
    }

    fn list(&self, channels: &[(String, ChannelModes)]) {
        self.send(Event::List {
            channels: channels.to_vec(),
        });
    }

    fn users(&self, channel: Option<&str>, users: &[(UserInfo, PresenceModes)]) {
        self.send(Event::Users {
            channel: channel.map(str::to_string),
            users: users.to_vec(),
        });
    }

    fn usermatch(&self, pattern: &AddressSpec, matches: &[UserMatch]) {
        self.send(Event::UserMatch {
            pattern: pattern.clone(),
            matches: matches.to_vec(),
        });
    }

    fn join(&self, user: &UserInfo, channel: &str) {
        self.send(Event::Join {
            user: user.clone(),
            channel: channel.to_string(),
        });
    }

    fn topic(&self, channel: &str, value: &str) {
        self.send(Event::Topic {
            channel: channel.to_string(),
            value: value.to_string(),
        });
    }

    fn msg(&self, from: &UserInfo, channel: &str, content: &str) {
        self.send(Event::Msg {
            from: from.clone(),
            channel: channel.to_string(),
            content: content.to_string(),
        });
    }

    fn privmsg(&self, from: &UserInfo, user: &UserInfo, content: &str) {
        self.send(Event::PrivMsg {
            from: from.clone(),
            user: user.clone(),
            content: content.to_string(),
        });
    }

    fn leave(&self, user: &UserInfo, channel: &str, reason: Option<&str>) {
        self.send(Event::Leave {
            user: user.clone(),
            channel: channel.to_string(),
            reason: reason.map(str::to_string),
        });
    }

    fn channelmode(&self, channel: &str, options: &ChannelModes) {
        self.send(Event::ChannelMode {
            channel: channel.to_string(),
            options: *options,
        });
    }

    fn chanusermode(&self, channel: &str, user: &UserInfo, options: &MemberModes, flags: Option<&UserModes>) {
        self.send(Event::ChannelUserMode {
            channel: channel.to_string(),
            user: user.clone(),
            options: *options,
            flags: flags.copied(),
        });
    }

    fn usermode(&self, user: &UserInfo, options: &UserModes) {
        self.send(Event::UserMode {
            user: user.clone(),
            options: *options,
        });
    }

    fn kick(&self, user: &UserInfo, channel: &str, reason: Option<&str>) {
        self.send(Event::Kick {
            user: user.clone(),
            channel: channel.to_string(),
            reason: reason.map(str::to_string),
        });
    }

    fn wall(&self, from: &UserInfo, content: &str) {
        self.send(Event::Wall {
            from: from.clone(),
            content: content.to_string(),
        });
    }
}
