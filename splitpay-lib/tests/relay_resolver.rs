//! RelayResolver against a local WebSocket relay.

mod common;

use common::{
    dead_relay_url, npub, plaintext_tls_url, profile_event, public_key, spawn_relay, RelayScript,
};
use serde_json::json;
use splitpay_lib::{IdentityResolver, PayableAddress, RelayConfig, RelayResolver, ResolutionError};
use tokio_tungstenite::tungstenite::Message;

fn resolver(url: &str) -> RelayResolver {
    RelayResolver::new(
        RelayConfig::new(url)
            .with_timeout(1)
            .with_subscription_id("test-sub"),
    )
}

#[tokio::test]
async fn resolves_lightning_address_and_closes() {
    let key = public_key(4);
    let (url, relay) = spawn_relay(RelayScript::Reply(vec![profile_event(
        "test-sub",
        &key,
        json!({"name": "user", "lud16": "user@domain.com"}),
    )]))
    .await;

    let resolved = resolver(&url).resolve(&npub(4)).await.unwrap();
    assert_eq!(resolved.public_key, key);
    assert_eq!(
        resolved.payable_address,
        PayableAddress::LightningAddress("user@domain.com".into())
    );

    let log = relay.await.unwrap();
    assert!(log.client_closed, "resolver must close the connection");
    let request: serde_json::Value = serde_json::from_str(&log.request).unwrap();
    assert_eq!(
        request,
        json!(["REQ", "test-sub", {"kinds": [0], "limit": 10, "authors": [key]}])
    );
}

#[tokio::test]
async fn falls_back_to_lnurl() {
    let key = public_key(5);
    let (url, _relay) = spawn_relay(RelayScript::Reply(vec![profile_event(
        "test-sub",
        &key,
        json!({"lud16": "", "lud06": "lnurl1dp68gurn8ghj7"}),
    )]))
    .await;

    let resolved = resolver(&url).resolve(&npub(5)).await.unwrap();
    assert_eq!(
        resolved.payable_address,
        PayableAddress::Lnurl("lnurl1dp68gurn8ghj7".into())
    );
}

#[tokio::test]
async fn nostr_uri_prefix_accepted() {
    let key = public_key(6);
    let (url, _relay) = spawn_relay(RelayScript::Reply(vec![profile_event(
        "test-sub",
        &key,
        json!({"lud16": "six@domain.com"}),
    )]))
    .await;

    let resolved = resolver(&url)
        .resolve(&format!("nostr:{}", npub(6)))
        .await
        .unwrap();
    assert_eq!(resolved.payable_address.as_str(), "six@domain.com");
}

#[tokio::test]
async fn skips_non_text_frames() {
    let key = public_key(7);
    let (url, _relay) = spawn_relay(RelayScript::Reply(vec![
        Message::Binary(vec![1, 2, 3]),
        Message::Ping(vec![9]),
        profile_event("test-sub", &key, json!({"lud16": "seven@domain.com"})),
    ]))
    .await;

    let resolved = resolver(&url).resolve(&npub(7)).await.unwrap();
    assert_eq!(resolved.payable_address.as_str(), "seven@domain.com");
}

#[tokio::test]
async fn profile_without_address() {
    let key = public_key(8);
    let (url, _relay) = spawn_relay(RelayScript::Reply(vec![profile_event(
        "test-sub",
        &key,
        json!({"name": "no wallet"}),
    )]))
    .await;

    let err = resolver(&url).resolve(&npub(8)).await.unwrap_err();
    assert_eq!(err, ResolutionError::NoPayableAddress { public_key: key });
}

#[tokio::test]
async fn end_of_stored_events_is_protocol_error() {
    let (url, _relay) = spawn_relay(RelayScript::Reply(vec![Message::Text(
        json!(["EOSE", "test-sub"]).to_string(),
    )]))
    .await;

    let err = resolver(&url).resolve(&npub(9)).await.unwrap_err();
    assert!(matches!(err, ResolutionError::ProtocolError(_)), "{err:?}");
}

#[tokio::test]
async fn foreign_author_is_protocol_error() {
    let (url, _relay) = spawn_relay(RelayScript::Reply(vec![profile_event(
        "test-sub",
        &public_key(11),
        json!({"lud16": "someone@else.com"}),
    )]))
    .await;

    let err = resolver(&url).resolve(&npub(10)).await.unwrap_err();
    assert!(matches!(err, ResolutionError::ProtocolError(_)), "{err:?}");
}

#[tokio::test]
async fn close_before_answer_is_protocol_error() {
    let (url, _relay) = spawn_relay(RelayScript::Close).await;

    let err = resolver(&url).resolve(&npub(12)).await.unwrap_err();
    assert!(matches!(err, ResolutionError::ProtocolError(_)), "{err:?}");
}

#[tokio::test]
async fn silent_relay_times_out() {
    let (url, _relay) = spawn_relay(RelayScript::Silent).await;

    let err = resolver(&url).resolve(&npub(13)).await.unwrap_err();
    assert_eq!(
        err,
        ResolutionError::Timeout {
            relay: url,
            timeout_ms: 1000,
        }
    );
}

#[tokio::test]
async fn unreachable_relay() {
    let url = dead_relay_url().await;

    let err = resolver(&url).resolve(&npub(14)).await.unwrap_err();
    assert!(
        matches!(err, ResolutionError::Unreachable { ref relay, .. } if *relay == url),
        "{err:?}"
    );
}

#[tokio::test]
async fn failed_tls_handshake_is_unreachable() {
    let url = plaintext_tls_url().await;

    let err = resolver(&url).resolve(&npub(15)).await.unwrap_err();
    assert!(
        matches!(
            err,
            ResolutionError::Unreachable { .. } | ResolutionError::Timeout { .. }
        ),
        "{err:?}"
    );
}

#[tokio::test]
async fn request_carries_configured_limit() {
    let key = public_key(16);
    let (url, relay) = spawn_relay(RelayScript::Reply(vec![profile_event(
        "test-sub",
        &key,
        json!({"lud16": "limit@domain.com"}),
    )]))
    .await;

    let resolver = RelayResolver::new(
        RelayConfig::new(&url)
            .with_limit(1)
            .with_subscription_id("test-sub"),
    );
    resolver.resolve(&npub(16)).await.unwrap();

    let request: serde_json::Value = serde_json::from_str(&relay.await.unwrap().request).unwrap();
    assert_eq!(request[2]["limit"], json!(1));
}

#[tokio::test]
async fn malformed_npub_fails_before_connecting() {
    // Nothing listens here; a connection attempt would report Unreachable.
    let url = dead_relay_url().await;

    let err = resolver(&url).resolve("npub1notreallybech32").await.unwrap_err();
    assert!(
        matches!(err, ResolutionError::MalformedIdentifier { .. }),
        "{err:?}"
    );
}
