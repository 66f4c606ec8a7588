//! Classification of user-supplied target identifiers.
//!
//! Only cheap substring checks are performed here; decoding and lookups
//! happen later, depending on the kind.

use serde::{Deserialize, Serialize};

/// Marker of a nostr public-key identity.
pub const PUBLIC_KEY_MARKER: &str = "npub";

/// Marker of an LNURL payment request.
pub const URL_SCHEME_MARKER: &str = "lnurl";

/// The four kinds of target identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Internal wallet id or API key.
    Direct,
    /// Lightning address (`name@domain`).
    EmailAddress,
    /// LNURL payment request.
    UrlScheme,
    /// Nostr `npub`, resolved through a relay.
    PublicKey,
}

impl IdentifierKind {
    /// Whether targets of this kind need a directory round trip.
    pub fn requires_resolution(&self) -> bool {
        matches!(self, Self::PublicKey)
    }

    /// Whether targets of this kind name a local wallet.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Direct)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::EmailAddress => "email_address",
            Self::UrlScheme => "url_scheme",
            Self::PublicKey => "public_key",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `identifier`.
///
/// The public-key marker wins over everything else, then `@`, then the
/// LNURL marker. Anything left is a direct wallet reference. Markers are
/// matched case-insensitively since bech32 strings may be all upper case.
///
/// ```
/// use splitpay_lib::{classify, IdentifierKind};
///
/// assert_eq!(classify("alice@getalby.com"), IdentifierKind::EmailAddress);
/// assert_eq!(classify("a1b2c3"), IdentifierKind::Direct);
/// ```
pub fn classify(identifier: &str) -> IdentifierKind {
    let lowered = identifier.to_ascii_lowercase();

    if lowered.contains(PUBLIC_KEY_MARKER) {
        IdentifierKind::PublicKey
    } else if lowered.contains('@') {
        IdentifierKind::EmailAddress
    } else if lowered.contains(URL_SCHEME_MARKER) {
        IdentifierKind::UrlScheme
    } else {
        IdentifierKind::Direct
    }
}
