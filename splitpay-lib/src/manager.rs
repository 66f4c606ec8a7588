//! Target set manager.
//!
//! Turns an ordered list of [`TargetEntry`] into a committed target set:
//! each entry is classified, resolved when it is a public key, and
//! validated with a running percent total. The first failing entry aborts
//! the batch and the stored set of the source stays untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::Mutex as AsyncMutex;

use crate::errors::SplitError;
use crate::identifier::{classify, IdentifierKind};
use crate::nostr::{IdentityResolver, ResolvedIdentity};
use crate::storage::{TargetStore, WalletDirectory};
use crate::validation::{Destination, TargetValidator};
use crate::{Result, Target, TargetEntry, WalletId};

/// Maintains the target sets of all source wallets.
///
/// Mutations of one source are serialized; different sources proceed
/// independently.
pub struct TargetSetManager {
    store: Arc<dyn TargetStore>,
    wallets: Arc<dyn WalletDirectory>,
    resolver: Arc<dyn IdentityResolver>,
    source_locks: Mutex<HashMap<WalletId, Arc<AsyncMutex<()>>>>,
}

impl TargetSetManager {
    pub fn new(
        store: Arc<dyn TargetStore>,
        wallets: Arc<dyn WalletDirectory>,
        resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            store,
            wallets,
            resolver,
            source_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Current target set of `source`, in stored order.
    pub async fn get_targets(&self, source: &WalletId) -> Result<Vec<Target>> {
        Ok(self.store.get_targets(source).await?)
    }

    /// Validate `entries` and replace the target set of `source` with them.
    ///
    /// Entries are processed strictly in order and public keys are resolved
    /// one at a time. Returns the committed targets. On error nothing is
    /// written.
    #[tracing::instrument(skip(self, entries), fields(source = %source, entries = entries.len()))]
    pub async fn set_targets(
        &self,
        source: &WalletId,
        entries: Vec<TargetEntry>,
    ) -> Result<Vec<Target>> {
        let lock = self.source_lock(source);
        let _guard = lock.lock().await;

        let targets = match self.build_targets(source, &entries).await {
            Ok(targets) => targets,
            Err(err) => {
                tracing::warn!(code = ?err.code(), "rejected target set: {err}");
                return Err(err);
            }
        };

        self.store.set_targets(source, targets.clone()).await?;
        tracing::info!(
            targets = targets.len(),
            allocated = %crate::allocated_percent(&targets),
            "committed target set"
        );
        Ok(targets)
    }

    /// Remove every target of `source`. Deleting an empty set is a no-op.
    #[tracing::instrument(skip(self), fields(source = %source))]
    pub async fn delete_all(&self, source: &WalletId) -> Result<()> {
        let lock = self.source_lock(source);
        let _guard = lock.lock().await;

        self.store.set_targets(source, Vec::new()).await?;
        tracing::info!("deleted target set");
        Ok(())
    }

    async fn build_targets(
        &self,
        source: &WalletId,
        entries: &[TargetEntry],
    ) -> Result<Vec<Target>> {
        let validator = TargetValidator::new(self.wallets.as_ref(), source);
        let mut running_total = Decimal::ZERO;
        let mut targets = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let kind = classify(&entry.wallet);
            tracing::debug!(index, kind = %kind, "processing entry");
            validator.check_percent(index, entry)?;

            let resolved: ResolvedIdentity;
            let destination = match kind {
                IdentifierKind::Direct => Destination::Local(&entry.wallet),
                IdentifierKind::EmailAddress | IdentifierKind::UrlScheme => {
                    Destination::External(&entry.wallet)
                }
                IdentifierKind::PublicKey => {
                    resolved = self
                        .resolver
                        .resolve(&entry.wallet)
                        .await
                        .map_err(|err| SplitError::rejected(index, &entry.wallet, err))?;
                    Destination::External(resolved.payable_address.as_str())
                }
            };

            let outcome = validator
                .validate(index, entry, destination, running_total)
                .await?;
            running_total = outcome.running_total;

            targets.push(Target {
                source: source.clone(),
                wallet: outcome.wallet,
                wallet_name: entry.wallet.clone(),
                alias: entry.alias.clone(),
                percent: entry.percent,
            });
        }

        Ok(targets)
    }

    /// Lock guarding mutations of `source`. Locks nobody holds are dropped
    /// from the map on the way.
    fn source_lock(&self, source: &WalletId) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .source_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.retain(|id, lock| id == source || Arc::strong_count(lock) > 1);
        locks.entry(source.clone()).or_default().clone()
    }
}
