//! Process-wide extension context.
//!
//! [`SplitExtension`] is what a transport layer talks to: it owns the
//! [`TargetSetManager`] and the [`TaskRegistry`] of background workers that
//! apply committed splits to live payments. Create it when the extension is
//! activated and call [`SplitExtension::stop`] when it is deactivated.

use std::sync::Arc;

use crate::config::SplitConfig;
use crate::manager::TargetSetManager;
use crate::nostr::{IdentityResolver, RelayResolver};
use crate::storage::{TargetStore, WalletDirectory};
use crate::tasks::{StopReport, TaskRegistry};
use crate::{Result, Target, TargetEntry, WalletId};

/// Activated split payments extension.
pub struct SplitExtension {
    manager: Arc<TargetSetManager>,
    tasks: TaskRegistry,
}

impl SplitExtension {
    /// Activate with the relay resolver described by `config.relay`.
    pub fn new(
        config: SplitConfig,
        store: Arc<dyn TargetStore>,
        wallets: Arc<dyn WalletDirectory>,
    ) -> Self {
        let resolver = Arc::new(RelayResolver::new(config.relay.clone()));
        Self::with_resolver(config, store, wallets, resolver)
    }

    /// Activate with a custom resolver.
    pub fn with_resolver(
        config: SplitConfig,
        store: Arc<dyn TargetStore>,
        wallets: Arc<dyn WalletDirectory>,
        resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        let tasks = TaskRegistry::new(config.shutdown_grace());
        let manager = Arc::new(TargetSetManager::new(store, wallets, resolver));
        tracing::info!(relay = %config.relay.url, "split payments extension activated");
        Self { manager, tasks }
    }

    /// Shared manager, for background workers that read target sets.
    pub fn manager(&self) -> &Arc<TargetSetManager> {
        &self.manager
    }

    /// Registry background workers are spawned on.
    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Targets of the caller's wallet.
    pub async fn list_targets(&self, source: &WalletId) -> Result<Vec<Target>> {
        self.manager.get_targets(source).await
    }

    /// Replace the targets of the caller's wallet.
    pub async fn replace_targets(&self, source: &WalletId, entries: Vec<TargetEntry>) -> Result<()> {
        self.manager.set_targets(source, entries).await.map(|_| ())
    }

    /// Remove all targets of the caller's wallet.
    pub async fn delete_targets(&self, source: &WalletId) -> Result<()> {
        self.manager.delete_all(source).await
    }

    /// Deactivate: cancel every background task.
    ///
    /// Never fails; per-task problems are logged and listed in the report.
    pub async fn stop(&self) -> StopReport {
        tracing::info!(tasks = self.tasks.len(), "deactivating split payments extension");
        self.tasks.stop_all().await
    }
}
