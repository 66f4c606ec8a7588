//! Test fixtures and data generators.

use std::sync::Arc;

use crate::nostr::keys::encode_npub;
use crate::storage::{MemoryTargetStore, MemoryWalletDirectory};
use crate::{TargetSetManager, Wallet, WalletId};

use super::StaticResolver;

/// Collection of commonly used test fixtures.
pub struct TestFixtures;

impl TestFixtures {
    /// Source wallet registered by [`TestContext`].
    pub const SOURCE_WALLET: &'static str = "src";

    /// Other wallets registered by [`TestContext`].
    pub const PEER_WALLETS: &'static [&'static str] = &["abc123", "def456"];
}

/// Hex public key made of 32 copies of `seed`.
pub fn test_public_key(seed: u8) -> String {
    hex::encode([seed; 32])
}

/// `npub` encoding of [`test_public_key`].
pub fn test_npub(seed: u8) -> String {
    encode_npub(&test_public_key(seed)).expect("fixed-size key always encodes")
}

/// Wallet whose keys are `<id>-admin` and `<id>-invoice`.
pub fn test_wallet(id: &str) -> Wallet {
    Wallet {
        id: WalletId::new(id),
        name: format!("{id} wallet"),
        admin_key: format!("{id}-admin"),
        invoice_key: format!("{id}-invoice"),
    }
}

/// A manager wired to in-memory collaborators.
///
/// The directory knows the source wallet and [`TestFixtures::PEER_WALLETS`].
pub struct TestContext {
    pub source: WalletId,
    pub store: Arc<MemoryTargetStore>,
    pub wallets: Arc<MemoryWalletDirectory>,
    pub resolver: Arc<StaticResolver>,
    pub manager: TargetSetManager,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryTargetStore::new());
        let wallets = Arc::new(MemoryWalletDirectory::new());
        let resolver = Arc::new(StaticResolver::new());

        wallets.insert(test_wallet(TestFixtures::SOURCE_WALLET));
        for id in TestFixtures::PEER_WALLETS {
            wallets.insert(test_wallet(id));
        }

        let manager = TargetSetManager::new(store.clone(), wallets.clone(), resolver.clone());
        Self {
            source: WalletId::new(TestFixtures::SOURCE_WALLET),
            store,
            wallets,
            resolver,
            manager,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
