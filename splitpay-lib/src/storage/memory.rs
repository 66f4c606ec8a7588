//! In-memory collaborators.
//!
//! Intended for tests and embedding; contents are lost when the process
//! exits.
//!
//! # Thread Safety
//!
//! Both types use `RwLock`. Lock poisoning is reported as a storage error
//! rather than a panic.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{StorageResult, TargetStore, WalletDirectory};
use crate::errors::StorageError;
use crate::{KeyKind, Target, Wallet, WalletId};

fn lock_error(context: &str) -> StorageError {
    StorageError::Backend(format!("lock poisoned during {context}"))
}

/// Target sets held in a map.
#[derive(Default)]
pub struct MemoryTargetStore {
    sets: RwLock<HashMap<WalletId, Vec<Target>>>,
}

impl MemoryTargetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sources with a non-empty target set.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.sets.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Check if no source has targets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TargetStore for MemoryTargetStore {
    async fn get_targets(&self, source: &WalletId) -> StorageResult<Vec<Target>> {
        let sets = self.sets.read().map_err(|_| lock_error("get_targets"))?;
        Ok(sets.get(source).cloned().unwrap_or_default())
    }

    async fn set_targets(&self, source: &WalletId, targets: Vec<Target>) -> StorageResult<()> {
        let mut sets = self.sets.write().map_err(|_| lock_error("set_targets"))?;
        if targets.is_empty() {
            sets.remove(source);
        } else {
            sets.insert(source.clone(), targets);
        }
        Ok(())
    }
}

/// Wallets held in a map keyed by id.
#[derive(Default)]
pub struct MemoryWalletDirectory {
    wallets: RwLock<HashMap<WalletId, Wallet>>,
}

impl MemoryWalletDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a wallet.
    pub fn insert(&self, wallet: Wallet) {
        let mut wallets = self.wallets.write().unwrap_or_else(|e| e.into_inner());
        wallets.insert(wallet.id.clone(), wallet);
    }
}

#[async_trait]
impl WalletDirectory for MemoryWalletDirectory {
    async fn get_wallet(&self, id: &WalletId) -> StorageResult<Option<Wallet>> {
        let wallets = self.wallets.read().map_err(|_| lock_error("get_wallet"))?;
        Ok(wallets.get(id).cloned())
    }

    async fn get_wallet_for_key(&self, key: &str, kind: KeyKind) -> StorageResult<Option<Wallet>> {
        let wallets = self
            .wallets
            .read()
            .map_err(|_| lock_error("get_wallet_for_key"))?;
        Ok(wallets.values().find(|w| w.has_key(key, kind)).cloned())
    }
}
