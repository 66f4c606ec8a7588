//! Splitpay library.
//!
//! Maintains, per source wallet, the ordered list of payout targets that
//! govern how incoming payments are split. Storage, wallet lookup and
//! directory access are injected through traits so that the engine itself
//! stays stateless.
//!
//! # Features
//!
//! - **Identifier classification**: wallet ids, lightning addresses, LNURLs and nostr `npub`s
//! - **Public-key resolution**: one-shot metadata query against a nostr relay
//! - **Validation**: positive percents, no self-split, 100% ceiling
//! - **Atomic replacement**: a target set is committed whole or not at all
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use splitpay_lib::prelude::*;
//! use splitpay_lib::storage::{MemoryTargetStore, MemoryWalletDirectory};
//!
//! let manager = TargetSetManager::new(
//!     Arc::new(MemoryTargetStore::new()),
//!     Arc::new(MemoryWalletDirectory::new()),
//!     Arc::new(RelayResolver::new(RelayConfig::default())),
//! );
//!
//! let source = WalletId::new("source-wallet");
//! let entries = vec![TargetEntry::new("npub1...", dec!(30))];
//! let committed = manager.set_targets(&source, entries).await?;
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod errors;
pub mod extension;
pub mod identifier;
pub mod manager;
pub mod nostr;
pub mod prelude;
pub mod storage;
pub mod tasks;
pub mod validation;

/// Test utilities for split target testing.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{RelayConfig, SplitConfig};
pub use errors::{
    RejectReason, ResolutionError, SplitError, SplitErrorCode, StorageError, ValidationError,
};
pub use extension::SplitExtension;
pub use identifier::{classify, IdentifierKind};
pub use manager::TargetSetManager;
pub use nostr::{IdentityResolver, PayableAddress, RelayResolver, ResolvedIdentity};
pub use tasks::{ShutdownSignal, StopReport, TaskRegistry};

/// Common result alias for split target operations.
pub type Result<T> = std::result::Result<T, SplitError>;

/// Upper bound for the sum of all target percents of one source.
pub const MAX_TOTAL_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Identifier of an internal wallet.
///
/// # Example
///
/// ```
/// use splitpay_lib::WalletId;
///
/// let id: WalletId = "4f2a9c".into();
/// assert_eq!(id.as_str(), "4f2a9c");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub String);

impl WalletId {
    /// Create a new WalletId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the wallet ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WalletId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WalletId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for WalletId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which API key of a wallet is presented when looking it up by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// Invoice (receive-only) key.
    Invoice,
    /// Admin key.
    Admin,
}

/// Internal wallet record as returned by the wallet directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Wallet identifier.
    pub id: WalletId,
    /// Display name.
    pub name: String,
    /// Admin API key.
    pub admin_key: String,
    /// Invoice API key.
    pub invoice_key: String,
}

impl Wallet {
    /// Returns true if `key` is this wallet's key of the given kind.
    pub fn has_key(&self, key: &str, kind: KeyKind) -> bool {
        match kind {
            KeyKind::Invoice => self.invoice_key == key,
            KeyKind::Admin => self.admin_key == key,
        }
    }
}

/// A candidate payout target as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    /// Wallet id, API key, lightning address, LNURL or npub.
    pub wallet: String,
    /// Share of each payment, in percent.
    pub percent: Decimal,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TargetEntry {
    /// Create an entry without alias.
    pub fn new(wallet: impl Into<String>, percent: Decimal) -> Self {
        Self {
            wallet: wallet.into(),
            percent,
            alias: None,
        }
    }

    /// Attach a display label.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A committed payout target of one source wallet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Wallet whose incoming payments are split.
    pub source: WalletId,
    /// Payable destination after resolution.
    pub wallet: String,
    /// Identifier exactly as the caller supplied it.
    pub wallet_name: String,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Share of each payment, in percent.
    pub percent: Decimal,
}

/// Sum of the percents of `targets`.
pub fn allocated_percent(targets: &[Target]) -> Decimal {
    targets.iter().map(|t| t.percent).sum()
}
