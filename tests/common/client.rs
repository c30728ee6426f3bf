//! In-process test clients.

#![allow(dead_code)]

use tokio::sync::mpsc::UnboundedReceiver;
use wschat_proto::{Command, Event};
use wschatd::config::{AdminBlock, LimitsConfig};
use wschatd::{Chat, EventQueue, SessionId};

/// An engine plus helpers to connect sessions to it.
pub struct TestChat {
    pub chat: Chat,
    next_port: u16,
}

impl TestChat {
    pub fn new() -> Self {
        Self::with_admins(&[])
    }

    /// Engine granting admin rights to urls matching any of `masks`.
    pub fn with_admins(masks: &[&str]) -> Self {
        let admins = masks
            .iter()
            .map(|mask| AdminBlock {
                mask: mask.to_string(),
            })
            .collect();
        Self {
            chat: Chat::new("Welcome to the server !", LimitsConfig::default(), admins),
            next_port: 40000,
        }
    }

    /// Connect an anonymous session from `host`.
    pub fn connect_from(&mut self, host: &str) -> TestClient {
        self.next_port += 1;
        let (queue, rx) = EventQueue::new();
        let url = format!("{host}:{}", self.next_port);
        let id = self.chat.connect(url, Box::new(queue));
        TestClient { id, rx }
    }

    /// Connect a session from a non-admin address and give it `nick`.
    pub fn connect(&mut self, nick: &str) -> TestClient {
        self.connect_as("10.0.0.1", nick)
    }

    /// Connect a session from `host`, give it `nick` and drain the echo.
    pub fn connect_as(&mut self, host: &str, nick: &str) -> TestClient {
        let mut client = self.connect_from(host);
        self.send(
            &client,
            Command::Nick {
                new: nick.to_string(),
            },
        );
        client.drain();
        client
    }

    pub fn send(&mut self, client: &TestClient, command: Command) {
        self.chat.handle(client.id, command);
    }

    /// Send a raw JSON frame the way a connection would.
    pub fn send_frame(&mut self, client: &TestClient, frame: &str) {
        let command: Command = frame.parse().expect("test frame should decode");
        self.chat.handle(client.id, command);
    }

    /// Join `channel` without a password and drain the replies.
    pub fn join(&mut self, client: &mut TestClient, channel: &str) {
        self.send(
            client,
            Command::Join {
                channel: channel.to_string(),
                password: None,
            },
        );
        client.drain();
    }

    pub fn disconnect(&mut self, client: &TestClient) {
        self.chat.disconnect(client.id, "connection closed");
    }
}

/// One connected session and its event queue.
pub struct TestClient {
    pub id: SessionId,
    rx: UnboundedReceiver<Event>,
}

impl TestClient {
    /// Take every event queued so far.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Messages of the error events queued so far.
    pub fn errors(&mut self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|event| match event {
                Event::Error { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Drain and assert that exactly one error with `message` was queued.
    pub fn expect_error(&mut self, message: &str) {
        assert_eq!(self.errors(), vec![message.to_string()]);
    }

    /// Drain and assert nothing was queued.
    pub fn expect_silence(&mut self) {
        let events = self.drain();
        assert!(events.is_empty(), "unexpected events: {events:?}");
    }
}
