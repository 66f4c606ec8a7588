//! Shared helpers for integration tests: a one-shot local relay and npub
//! fixtures.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// What the local relay does after reading the request.
pub enum RelayScript {
    /// Send these frames in order, then wait for the client to close.
    Reply(Vec<Message>),
    /// Close the connection without answering.
    Close,
    /// Never answer.
    Silent,
}

/// What the local relay observed.
#[derive(Debug)]
pub struct RelayLog {
    /// The request frame sent by the client.
    pub request: String,
    /// Whether the client sent a close frame after the answer.
    pub client_closed: bool,
}

/// Start a relay on an ephemeral port that serves exactly one connection.
pub async fn spawn_relay(script: RelayScript) -> (String, JoinHandle<RelayLog>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let request = match ws.next().await {
            Some(Ok(Message::Text(text))) => text,
            other => panic!("expected text request, got {other:?}"),
        };

        match script {
            RelayScript::Reply(frames) => {
                for frame in frames {
                    ws.send(frame).await.unwrap();
                }
            }
            RelayScript::Close => {
                ws.close(None).await.unwrap();
            }
            RelayScript::Silent => {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
        }

        let mut client_closed = false;
        while let Some(Ok(frame)) = ws.next().await {
            if frame.is_close() {
                client_closed = true;
                break;
            }
        }
        RelayLog {
            request,
            client_closed,
        }
    });

    (url, handle)
}

/// URL of a port nothing listens on.
pub async fn dead_relay_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}

/// `wss://` URL of a listener that answers the TLS handshake with plain
/// bytes and hangs up.
pub async fn plaintext_tls_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("wss://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = stream
                .write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n")
                .await;
        }
    });
    url
}

/// `EVENT` frame carrying a kind 0 profile of `pubkey`.
pub fn profile_event(subscription_id: &str, pubkey: &str, profile: serde_json::Value) -> Message {
    let message = json!([
        "EVENT",
        subscription_id,
        {
            "id": "0".repeat(64),
            "pubkey": pubkey,
            "created_at": 1_700_000_000,
            "kind": 0,
            "tags": [],
            "content": profile.to_string(),
            "sig": "0".repeat(128),
        }
    ]);
    Message::Text(message.to_string())
}

/// Hex public key made of 32 copies of `seed`.
pub fn public_key(seed: u8) -> String {
    hex::encode([seed; 32])
}

/// `npub` of [`public_key`].
pub fn npub(seed: u8) -> String {
    splitpay_lib::nostr::keys::encode_npub(&public_key(seed)).unwrap()
}
