//! End-to-end tests over a real WebSocket connection.

mod common;

use common::{TestServer, WsClient};
use serde_json::json;

#[tokio::test]
async fn test_handshake_greeting() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = WsClient::connect(&server.url())
        .await
        .expect("Failed to connect");

    let version = client.recv().await.expect("version frame");
    assert_eq!(version, json!(["version", {"protocol": "ws", "version": "1.2"}]));

    let motd = client.recv_verb("motd").await.expect("motd frame");
    assert_eq!(motd[1]["content"], "Test Server");

    let ident = client.recv_verb("ident").await.expect("ident frame");
    assert_eq!(ident[1]["nick"], "(nonick)");
    assert!(ident[1]["url"].as_str().is_some_and(|u| u.starts_with("127.0.0.1:")));
    assert_eq!(ident[1]["options"]["admin"], false);
}

#[tokio::test]
async fn test_version_check() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = WsClient::connect(&server.url()).await.unwrap();
    client.recv_verb("ident").await.unwrap();

    client
        .send(json!(["version", {"protocol": "ws", "version": "1.2"}]))
        .await
        .unwrap();
    assert_eq!(client.recv().await.unwrap()[0], "version");

    client
        .send(json!(["version", {"protocol": "ws", "version": "0.9"}]))
        .await
        .unwrap();
    let error = client.recv().await.unwrap();
    assert_eq!(error, json!(["error", {"message": "unrecognized protocol version"}]));
}

#[tokio::test]
async fn test_malformed_frames_are_protocol_errors() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = WsClient::connect(&server.url()).await.unwrap();
    client.recv_verb("ident").await.unwrap();

    for frame in ["not json", r#"{"verb": "ident"}"#, r#"["shutdown"]"#, r#"["join", {}]"#] {
        client.send_raw(frame).await.unwrap();
        let error = client.recv().await.unwrap();
        assert_eq!(error, json!(["error", {"message": "protocol error"}]), "frame {frame}");
    }

    // The connection survives.
    client.send(json!(["ident"])).await.unwrap();
    assert_eq!(client.recv().await.unwrap()[0], "ident");
}

#[tokio::test]
async fn test_chat_between_two_clients() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut alice = WsClient::connect(&server.url()).await.unwrap();
    let mut bob = WsClient::connect(&server.url()).await.unwrap();
    alice.recv_verb("ident").await.unwrap();
    bob.recv_verb("ident").await.unwrap();

    alice.send(json!(["nick", {"new": "alice"}])).await.unwrap();
    let nick = alice.recv_verb("nick").await.unwrap();
    assert_eq!(nick[1]["new"]["nick"], "alice");
    assert_eq!(nick[1]["old"]["nick"], "(nonick)");
    assert!(nick[1].get("channel").is_none());

    bob.send(json!(["nick", {"new": "bob"}])).await.unwrap();
    bob.recv_verb("nick").await.unwrap();

    alice.send(json!(["join", {"channel": "general"}])).await.unwrap();
    alice.recv_verb("topic").await.unwrap();
    bob.send(json!(["join", {"channel": "general"}])).await.unwrap();
    let users = bob.recv_verb("users").await.unwrap();
    assert_eq!(users[1]["users"].as_array().map(Vec::len), Some(2));
    bob.recv_verb("topic").await.unwrap();

    let joined = alice.recv_verb("join").await.unwrap();
    assert_eq!(joined[1]["user"]["nick"], "bob");

    bob.send(json!(["msg", {"channel": "general", "content": "hi alice"}]))
        .await
        .unwrap();
    let msg = alice.recv_verb("msg").await.unwrap();
    assert_eq!(msg[1]["from"]["nick"], "bob");
    assert_eq!(msg[1]["channel"], "general");
    assert_eq!(msg[1]["content"], "hi alice");

    bob.close().await.unwrap();
    let leave = alice.recv_verb("leave").await.unwrap();
    assert_eq!(leave[1]["user"]["nick"], "bob");
    assert_eq!(leave[1]["reason"], "bob has left the building !");
}

#[tokio::test]
async fn test_origin_is_enforced() {
    let server = TestServer::spawn_with_origins(&["https://chat.example"])
        .await
        .expect("Failed to spawn test server");
    assert!(WsClient::connect(&server.url()).await.is_err());
}
