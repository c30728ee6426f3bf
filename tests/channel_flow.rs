//! Integration tests for channel flows: join, msg, topic, leave.

mod common;

use common::TestChat;
use wschat_proto::{Command, Event, MemberModes, PresenceModes, UserModes};

fn join(channel: &str) -> Command {
    Command::Join {
        channel: channel.into(),
        password: None,
    }
}

#[test]
fn test_founder_gets_join_users_and_topic() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");

    chat.send(&alice, join("general"));
    let events = alice.drain();
    assert_eq!(events.len(), 3, "{events:?}");

    assert!(matches!(&events[0], Event::Join { user, channel } if user.nick == "alice" && channel == "general"));
    match &events[1] {
        Event::Users { channel, users } => {
            assert_eq!(channel.as_deref(), Some("general"));
            assert_eq!(users.len(), 1);
            assert_eq!(
                users[0].1,
                PresenceModes::member(UserModes::default(), MemberModes::founder())
            );
        }
        other => panic!("expected users, got {other:?}"),
    }
    assert_eq!(
        events[2],
        Event::Topic {
            channel: "general".into(),
            value: String::new()
        }
    );
    assert!(chat.chat.directory().is_consistent());
}

#[test]
fn test_channel_message_reaches_every_member() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    let mut carol = chat.connect("carol");
    chat.join(&mut alice, "general");
    chat.join(&mut bob, "general");
    alice.drain();

    chat.send(
        &bob,
        Command::Msg {
            channel: "general".into(),
            content: "hello".into(),
        },
    );

    for client in [&mut alice, &mut bob] {
        let events = client.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Event::Msg { from, content, .. } if from.nick == "bob" && content == "hello"));
    }
    carol.expect_silence();
}

#[test]
fn test_second_joiner_is_announced() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    chat.join(&mut alice, "general");

    chat.send(&bob, join("general"));
    let seen = alice.drain();
    assert_eq!(seen.len(), 1);
    assert!(matches!(&seen[0], Event::Join { user, .. } if user.nick == "bob"));

    let events = bob.drain();
    match &events[1] {
        Event::Users { users, .. } => {
            assert_eq!(users.len(), 2);
            let bob_modes = users.iter().find(|(u, _)| u.nick == "bob").map(|(_, m)| *m);
            assert_eq!(bob_modes.and_then(|m| m.operator), Some(false));
            assert_eq!(bob_modes.and_then(|m| m.voiced), Some(true));
        }
        other => panic!("expected users, got {other:?}"),
    }
}

#[test]
fn test_join_requires_nick() {
    let mut chat = TestChat::new();
    let mut anon = chat.connect_from("10.0.0.2");
    anon.drain();

    chat.send(&anon, join("general"));
    anon.expect_error("please choose your nickname first");
    assert_eq!(chat.chat.directory().channel_count(), 0);
}

#[test]
fn test_join_twice_and_invalid_name() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    chat.join(&mut alice, "general");

    chat.send(&alice, join("general"));
    alice.expect_error("channel general already joined");

    chat.send(&alice, join("#general"));
    alice.expect_error(
        "invalid name for a channel (max 25 letters, does not contain whitespace nor @ # & !)",
    );
    chat.send(&alice, join(&"x".repeat(26)));
    assert_eq!(alice.errors().len(), 1);
}

#[test]
fn test_leave_broadcasts_and_last_member_destroys_channel() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    chat.join(&mut alice, "general");
    chat.join(&mut bob, "general");
    alice.drain();

    chat.send(
        &bob,
        Command::Leave {
            channel: "general".into(),
            reason: Some("bye".into()),
        },
    );
    for client in [&mut alice, &mut bob] {
        let events = client.drain();
        assert_eq!(
            events,
            vec![Event::Leave {
                user: events_user(&events),
                channel: "general".into(),
                reason: Some("bye".into()),
            }]
        );
    }

    chat.send(
        &bob,
        Command::Leave {
            channel: "general".into(),
            reason: None,
        },
    );
    bob.expect_error("not participating in channel general");

    chat.send(
        &alice,
        Command::Leave {
            channel: "general".into(),
            reason: None,
        },
    );
    alice.drain();
    assert!(chat.chat.directory().channel("general").is_none());
    assert!(chat.chat.directory().is_consistent());
}

fn events_user(events: &[Event]) -> wschat_proto::UserInfo {
    match events.first() {
        Some(Event::Leave { user, .. }) => user.clone(),
        other => panic!("expected leave, got {other:?}"),
    }
}

#[test]
fn test_leave_reason_too_long() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    chat.join(&mut alice, "general");

    chat.send(
        &alice,
        Command::Leave {
            channel: "general".into(),
            reason: Some("r".repeat(51)),
        },
    );
    alice.expect_error("invalid reason (max 50 characters)");
    assert!(chat.chat.directory().channel("general").is_some());
}

#[test]
fn test_topic_lock_and_broadcast() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    chat.join(&mut alice, "general");
    chat.join(&mut bob, "general");
    alice.drain();

    chat.send(
        &bob,
        Command::Topic {
            channel: "general".into(),
            value: Some("rust".into()),
        },
    );
    let expected = Event::Topic {
        channel: "general".into(),
        value: "rust".into(),
    };
    assert_eq!(alice.drain(), vec![expected.clone()]);
    assert_eq!(bob.drain(), vec![expected]);

    chat.send_frame(&alice, r#"["mode", {"channel": "general", "options": {"topic": true}}]"#);
    alice.drain();
    bob.drain();

    chat.send(
        &bob,
        Command::Topic {
            channel: "general".into(),
            value: Some("go".into()),
        },
    );
    bob.expect_error("you are not allowed to modify channel topic");
    assert_eq!(chat.chat.directory().channel("general").map(|c| c.topic.as_str()), Some("rust"));
}

#[test]
fn test_password_protected_channel() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    chat.join(&mut alice, "vault");
    chat.send_frame(&alice, r#"["mode", {"channel": "vault", "options": {"password": "s3cret"}}]"#);
    match alice.drain().as_slice() {
        [Event::ChannelMode { options, .. }] => assert!(options.password),
        other => panic!("expected one mode event, got {other:?}"),
    }

    chat.send(&bob, join("vault"));
    bob.expect_error("a password is required to join channel vault");

    chat.send(
        &bob,
        Command::Join {
            channel: "vault".into(),
            password: Some("s3cret".into()),
        },
    );
    assert!(bob.errors().is_empty());
    assert!(chat.chat.directory().channel("vault").is_some_and(|c| c.has_member(bob.id)));
}

#[test]
fn test_secret_channel_is_hidden() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    chat.join(&mut alice, "lounge");
    chat.join(&mut alice, "hideout");
    chat.send_frame(&alice, r#"["mode", {"channel": "hideout", "options": {"secret": true}}]"#);
    alice.drain();

    chat.send(&bob, Command::List);
    match bob.drain().as_slice() {
        [Event::List { channels }] => {
            let names: Vec<&str> = channels.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["lounge"]);
        }
        other => panic!("expected list, got {other:?}"),
    }

    chat.send(
        &bob,
        Command::Topic {
            channel: "hideout".into(),
            value: None,
        },
    );
    bob.expect_error("channel hideout does not exist");

    chat.send(&alice, Command::List);
    match alice.drain().as_slice() {
        [Event::List { channels }] => assert_eq!(channels.len(), 2),
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn test_nick_change_is_seen_in_channels() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    let mut carol = chat.connect("carol");
    chat.join(&mut alice, "general");
    chat.join(&mut alice, "lounge");
    chat.join(&mut bob, "general");
    alice.drain();

    chat.send(&alice, Command::Nick { new: "alicia".into() });

    // One event for the session itself, then one per channel.
    let own = alice.drain();
    assert_eq!(own.len(), 3);
    assert!(matches!(&own[0], Event::Nick { channel: None, old, new } if old.nick == "alice" && new.nick == "alicia"));
    let mut channels: Vec<&str> = own[1..]
        .iter()
        .filter_map(|e| match e {
            Event::Nick { channel, .. } => channel.as_deref(),
            _ => None,
        })
        .collect();
    channels.sort_unstable();
    assert_eq!(channels, vec!["general", "lounge"]);
    match bob.drain().as_slice() {
        [Event::Nick { channel, new, .. }] => {
            assert_eq!(channel.as_deref(), Some("general"));
            assert_eq!(new.nick, "alicia");
        }
        other => panic!("expected nick, got {other:?}"),
    }
    carol.expect_silence();

    chat.send(&carol, Command::Nick { new: "caroline".into() });
    match carol.drain().as_slice() {
        [Event::Nick { channel: None, new, .. }] => assert_eq!(new.nick, "caroline"),
        other => panic!("expected a single nick event, got {other:?}"),
    }
    alice.expect_silence();
    bob.expect_silence();
}

#[test]
fn test_disconnect_leaves_every_channel() {
    let mut chat = TestChat::new();
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");
    chat.join(&mut alice, "general");
    chat.join(&mut alice, "rust");
    chat.join(&mut bob, "general");
    alice.drain();

    chat.disconnect(&alice);

    match bob.drain().as_slice() {
        [Event::Leave { user, channel, reason }] => {
            assert_eq!(user.nick, "alice");
            assert_eq!(channel, "general");
            assert_eq!(reason.as_deref(), Some("alice has left the building !"));
        }
        other => panic!("expected one leave, got {other:?}"),
    }
    let directory = chat.chat.directory();
    assert!(directory.session(alice.id).is_none());
    assert!(directory.channel("rust").is_none());
    assert_eq!(directory.channel("general").map(|c| c.len()), Some(1));
    assert!(directory.is_consistent());
}
