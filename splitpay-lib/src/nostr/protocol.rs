//! Relay message framing (NIP-01) for the profile metadata query.
//!
//! Request: `["REQ", <sub id>, {"kinds":[0],"limit":<n>,"authors":[<hex>]}]`.
//! Response: `["EVENT", <sub id>, <event>]` where `event.content` is itself a
//! JSON document holding the profile.

use serde_json::Value;

use super::PayableAddress;
use crate::errors::ResolutionError;

/// Event kind of profile metadata.
pub const METADATA_KIND: u64 = 0;

/// Profile field holding a lightning address.
pub const LUD16_FIELD: &str = "lud16";

/// Profile field holding an LNURL.
pub const LUD06_FIELD: &str = "lud06";

/// The parts of a relay event the resolver uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayEvent {
    /// Subscription id echoed by the relay.
    pub subscription_id: String,
    /// Raw content string.
    pub content: String,
}

/// Serialize the metadata query for `author_hex`.
pub fn metadata_request(subscription_id: &str, author_hex: &str, limit: u32) -> String {
    serde_json::json!([
        "REQ",
        subscription_id,
        {
            "kinds": [METADATA_KIND],
            "limit": limit,
            "authors": [author_hex],
        }
    ])
    .to_string()
}

/// Parse one relay message, expecting an `EVENT` authored by `expected_author`.
pub fn parse_event_message(
    text: &str,
    expected_author: &str,
) -> Result<RelayEvent, ResolutionError> {
    let message: Value = serde_json::from_str(text)
        .map_err(|err| ResolutionError::protocol(format!("response is not JSON: {err}")))?;

    let parts = match message.as_array() {
        Some(parts) if parts.len() == 3 => parts,
        _ => {
            return Err(ResolutionError::protocol(format!(
                "expected [type, subscription, event], got {}",
                truncate(text)
            )))
        }
    };

    let message_type = parts[0].as_str().unwrap_or_default();
    if message_type != "EVENT" {
        return Err(ResolutionError::protocol(format!(
            "expected EVENT message, got '{message_type}'"
        )));
    }

    let subscription_id = parts[1]
        .as_str()
        .ok_or_else(|| ResolutionError::protocol("subscription id is not a string"))?
        .to_string();

    let event = parts[2]
        .as_object()
        .ok_or_else(|| ResolutionError::protocol("event is not an object"))?;

    let content = event
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| ResolutionError::protocol("event has no content"))?
        .to_string();

    if let Some(kind) = event.get("kind").and_then(Value::as_u64) {
        if kind != METADATA_KIND {
            return Err(ResolutionError::protocol(format!(
                "expected kind {METADATA_KIND} event, got kind {kind}"
            )));
        }
    }

    if let Some(author) = event.get("pubkey").and_then(Value::as_str) {
        if !author.eq_ignore_ascii_case(expected_author) {
            return Err(ResolutionError::protocol(format!(
                "event authored by {author}, expected {expected_author}"
            )));
        }
    }

    Ok(RelayEvent {
        subscription_id,
        content,
    })
}

/// Extract the payable address from profile `content`.
///
/// A non-empty `lud16` wins; otherwise a non-empty `lud06` is used.
pub fn payable_address(content: &str, public_key: &str) -> Result<PayableAddress, ResolutionError> {
    let profile: Value = serde_json::from_str(content)
        .map_err(|err| ResolutionError::protocol(format!("profile is not JSON: {err}")))?;
    let profile = profile
        .as_object()
        .ok_or_else(|| ResolutionError::protocol("profile is not a JSON object"))?;

    let field = |name: &str| {
        profile
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    if let Some(address) = field(LUD16_FIELD) {
        return Ok(PayableAddress::LightningAddress(address));
    }
    if let Some(lnurl) = field(LUD06_FIELD) {
        return Ok(PayableAddress::Lnurl(lnurl));
    }

    Err(ResolutionError::NoPayableAddress {
        public_key: public_key.to_string(),
    })
}

fn truncate(text: &str) -> String {
    const MAX: usize = 120;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
