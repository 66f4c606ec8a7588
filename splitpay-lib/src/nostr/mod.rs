//! Nostr public-key resolution.
//!
//! An `npub` is decoded to its hex public key, the key's profile metadata
//! (kind 0) is fetched from a relay in a single request/response exchange,
//! and the lightning address found in the profile becomes the payable
//! address of the target.

use async_trait::async_trait;

use crate::errors::ResolutionError;

pub mod keys;
pub mod protocol;
mod relay;

pub use keys::decode_npub;
pub use relay::RelayResolver;

/// Address a payment can be sent to, discovered from a profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayableAddress {
    /// `lud16` lightning address (`name@domain`).
    LightningAddress(String),
    /// `lud06` LNURL.
    Lnurl(String),
}

impl PayableAddress {
    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::LightningAddress(address) | Self::Lnurl(address) => address,
        }
    }

    /// Consume and return the address string.
    pub fn into_string(self) -> String {
        match self {
            Self::LightningAddress(address) | Self::Lnurl(address) => address,
        }
    }
}

impl std::fmt::Display for PayableAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one resolution. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Lowercase hex public key.
    pub public_key: String,
    /// Address discovered in the profile.
    pub payable_address: PayableAddress,
}

/// Resolves public-key identifiers to payable addresses.
///
/// Injected into the [`TargetSetManager`](crate::TargetSetManager) so tests
/// can substitute a stub for the network.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve `identifier` (an `npub`, optionally `nostr:` prefixed).
    async fn resolve(&self, identifier: &str) -> Result<ResolvedIdentity, ResolutionError>;
}
