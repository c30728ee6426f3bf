//! Integration tests for server administration: motd, wall, user modes.

mod common;

use common::TestChat;
use wschat_proto::{AddressSpec, Command, Event, UserModes};

#[test]
fn test_admin_mask_grants_rights() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let root = chat.connect_as("127.0.0.1", "root");
    let alice = chat.connect("alice");

    let directory = chat.chat.directory();
    assert!(directory.session(root.id).is_some_and(|s| s.is_admin()));
    assert!(directory.session(alice.id).is_some_and(|s| !s.is_admin()));
}

#[test]
fn test_identify_reprovisions_and_sends_ident() {
    let mut chat = TestChat::with_admins(&["*.ops.example:*"]);
    let mut alice = chat.connect("alice");

    chat.chat
        .identify(alice.id, Some("bastion.ops.example:40001".into()));
    match alice.drain().as_slice() {
        [Event::Ident(info)] => {
            assert_eq!(info.url, "bastion.ops.example:40001");
            assert!(info.options.admin);
        }
        other => panic!("expected ident, got {other:?}"),
    }

    // An unanswered lookup keeps the peer address.
    let mut bob = chat.connect("bob");
    chat.chat.identify(bob.id, None);
    match bob.drain().as_slice() {
        [Event::Ident(info)] => assert!(info.url.starts_with("10.0.0.1:")),
        other => panic!("expected ident, got {other:?}"),
    }
}

#[test]
fn test_motd_read_and_set() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let mut root = chat.connect_as("127.0.0.1", "root");
    let mut alice = chat.connect("alice");

    chat.send(&alice, Command::Motd { value: None });
    assert_eq!(
        alice.drain(),
        vec![Event::Motd {
            content: "Welcome to the server !".into()
        }]
    );

    chat.send(
        &alice,
        Command::Motd {
            value: Some("mine now".into()),
        },
    );
    alice.expect_error("you are not allowed to modify server motd");

    chat.send(
        &root,
        Command::Motd {
            value: Some("maintenance at noon".into()),
        },
    );
    let expected = vec![Event::Motd {
        content: "maintenance at noon".into(),
    }];
    assert_eq!(alice.drain(), expected);
    assert_eq!(root.drain(), expected);
    assert_eq!(chat.chat.motd_text(), "maintenance at noon");
}

#[test]
fn test_wall_requires_admin() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let mut root = chat.connect_as("127.0.0.1", "root");
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");

    chat.send(
        &alice,
        Command::Wall {
            pattern: AddressSpec::everyone(),
            content: "hello all".into(),
        },
    );
    alice.expect_error("insufficient privileges");
    bob.expect_silence();

    chat.send(
        &root,
        Command::Wall {
            pattern: AddressSpec::nick_pattern("b*"),
            content: "hello b people".into(),
        },
    );
    match bob.drain().as_slice() {
        [Event::Wall { from, content }] => {
            assert_eq!(from.nick, "root");
            assert_eq!(content, "hello b people");
        }
        other => panic!("expected wall, got {other:?}"),
    }
    alice.expect_silence();
    root.expect_silence();
}

#[test]
fn test_global_users_is_admin_only() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let mut root = chat.connect_as("127.0.0.1", "root");
    let mut alice = chat.connect("alice");

    chat.send(&alice, Command::Users { channel: None });
    alice.expect_error("insufficient privileges");

    chat.send(&root, Command::Users { channel: None });
    match root.drain().as_slice() {
        [Event::Users { channel: None, users }] => {
            assert_eq!(users.len(), 2);
            assert!(users.iter().all(|(_, modes)| modes.operator.is_none()));
        }
        other => panic!("expected users, got {other:?}"),
    }
}

#[test]
fn test_bot_flag_on_self_and_others() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let mut root = chat.connect_as("127.0.0.1", "root");
    let mut alice = chat.connect("alice");
    let mut bob = chat.connect("bob");

    chat.send_frame(&alice, r#"["mode", {"user": "alice", "options": {"bot": true}}]"#);
    match alice.drain().as_slice() {
        [Event::UserMode { user, options }] => {
            assert_eq!(user.nick, "alice");
            assert_eq!(
                *options,
                UserModes {
                    admin: false,
                    bot: true
                }
            );
        }
        other => panic!("expected usermode, got {other:?}"),
    }

    chat.send_frame(&alice, r#"["mode", {"user": "bob", "options": {"bot": true}}]"#);
    alice.expect_error("you cannot make other people feel like a bot !");
    bob.expect_silence();

    chat.send_frame(&root, r#"["mode", {"user": "bob", "options": {"bot": true}}]"#);
    assert_eq!(bob.drain().len(), 1);
    assert_eq!(root.drain().len(), 1);
    assert!(
        chat.chat
            .directory()
            .session(bob.id)
            .is_some_and(|s| s.options.bot)
    );
}

#[test]
fn test_admin_flag_is_reserved() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let mut root = chat.connect_as("127.0.0.1", "root");
    let mut alice = chat.connect("alice");

    chat.send_frame(&alice, r#"["mode", {"user": "alice", "options": {"admin": true, "bot": true}}]"#);
    alice.expect_error("insufficient privileges");
    assert!(
        chat.chat
            .directory()
            .session(alice.id)
            .is_some_and(|s| !s.options.admin && !s.options.bot)
    );

    chat.send_frame(&root, r#"["mode", {"user": "alice", "options": {"admin": true}}]"#);
    root.drain();
    assert!(alice.drain().iter().any(|e| matches!(e, Event::UserMode { options, .. } if options.admin)));

    // Reading is open to everyone.
    chat.send_frame(&alice, r#"["mode", {"user": "root"}]"#);
    assert_eq!(alice.drain().len(), 1);
}

#[test]
fn test_admin_sees_secret_channels_and_joins_without_password() {
    let mut chat = TestChat::with_admins(&["127.0.0.1:*"]);
    let mut root = chat.connect_as("127.0.0.1", "root");
    let mut alice = chat.connect("alice");
    chat.join(&mut alice, "hideout");
    chat.send_frame(
        &alice,
        r#"["mode", {"channel": "hideout", "options": {"secret": true, "password": "pw"}}]"#,
    );
    alice.drain();

    chat.send(&root, Command::List);
    match root.drain().as_slice() {
        [Event::List { channels }] => assert_eq!(channels.len(), 1),
        other => panic!("expected list, got {other:?}"),
    }

    chat.join(&mut root, "hideout");
    assert!(
        chat.chat
            .directory()
            .channel("hideout")
            .is_some_and(|c| c.has_member(root.id))
    );
}
