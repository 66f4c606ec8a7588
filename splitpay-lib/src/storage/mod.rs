//! Persistence and wallet-lookup collaborators.
//!
//! The engine only needs read/replace semantics for target sets and two
//! lookups for wallets. Host applications implement these traits over their
//! own database; an in-memory and a JSON-file implementation are provided.

use async_trait::async_trait;

use crate::errors::StorageError;
use crate::{KeyKind, Target, Wallet, WalletId};

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::{MemoryTargetStore, MemoryWalletDirectory};

/// Result alias for collaborator calls.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage of target sets, keyed by source wallet.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Return the ordered targets of `source`; empty if none were set.
    async fn get_targets(&self, source: &WalletId) -> StorageResult<Vec<Target>>;

    /// Replace the whole target set of `source` with `targets`.
    ///
    /// Must be atomic: readers see either the old or the new list. An empty
    /// list deletes the set.
    async fn set_targets(&self, source: &WalletId, targets: Vec<Target>) -> StorageResult<()>;
}

/// Lookup of internal wallets.
#[async_trait]
pub trait WalletDirectory: Send + Sync {
    /// Find a wallet by id.
    async fn get_wallet(&self, id: &WalletId) -> StorageResult<Option<Wallet>>;

    /// Find the wallet owning `key` of the given kind.
    async fn get_wallet_for_key(&self, key: &str, kind: KeyKind) -> StorageResult<Option<Wallet>>;
}
