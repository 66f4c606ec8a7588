//! Decoding of bech32 `npub` identifiers.

use crate::errors::ResolutionError;

/// Human-readable part of a nostr public key.
pub const NPUB_HRP: &str = "npub";

/// Optional NIP-21 URI prefix.
pub const NOSTR_URI_PREFIX: &str = "nostr:";

/// Length of an x-only secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Decode `identifier` into a lowercase hex public key.
///
/// Fails with [`ResolutionError::MalformedIdentifier`] when the checksum or
/// padding is invalid, the prefix is not `npub`, or the key has the wrong
/// length. A trailing zero padding byte is dropped before the length check.
pub fn decode_npub(identifier: &str) -> Result<String, ResolutionError> {
    let trimmed = identifier.trim();
    let encoded = trimmed.strip_prefix(NOSTR_URI_PREFIX).unwrap_or(trimmed);

    let (hrp, mut data) = bech32::decode(encoded)
        .map_err(|err| ResolutionError::malformed(identifier, err.to_string()))?;

    if hrp.to_lowercase() != NPUB_HRP {
        return Err(ResolutionError::malformed(
            identifier,
            format!("expected '{NPUB_HRP}' prefix, got '{hrp}'"),
        ));
    }

    if data.len() == PUBLIC_KEY_LEN + 1 && data.last() == Some(&0) {
        data.pop();
    }

    if data.len() != PUBLIC_KEY_LEN {
        return Err(ResolutionError::malformed(
            identifier,
            format!("expected {PUBLIC_KEY_LEN} key bytes, got {}", data.len()),
        ));
    }

    Ok(hex::encode(data))
}

/// Encode a hex public key as `npub`. Inverse of [`decode_npub`].
pub fn encode_npub(public_key_hex: &str) -> Result<String, ResolutionError> {
    let bytes = hex::decode(public_key_hex)
        .map_err(|err| ResolutionError::malformed(public_key_hex, err.to_string()))?;
    if bytes.len() != PUBLIC_KEY_LEN {
        return Err(ResolutionError::malformed(
            public_key_hex,
            format!("expected {PUBLIC_KEY_LEN} key bytes, got {}", bytes.len()),
        ));
    }
    let hrp = bech32::Hrp::parse(NPUB_HRP)
        .map_err(|err| ResolutionError::malformed(public_key_hex, err.to_string()))?;
    bech32::encode::<bech32::Bech32>(hrp, &bytes)
        .map_err(|err| ResolutionError::malformed(public_key_hex, err.to_string()))
}
