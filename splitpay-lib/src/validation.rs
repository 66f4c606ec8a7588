//! Per-entry and aggregate invariants of a target set.
//!
//! Rules are applied in a fixed order: positive percent, local wallet
//! lookup (direct identifiers only), then the running total ceiling. The
//! percent rule is also exposed on its own so callers can apply it before
//! any network resolution. The
//! running total is checked after every entry so the first entry that tips
//! the sum over 100 is the one reported.

use rust_decimal::Decimal;

use crate::errors::{SplitError, ValidationError};
use crate::storage::WalletDirectory;
use crate::{KeyKind, TargetEntry, Wallet, WalletId, MAX_TOTAL_PERCENT};

/// Where an entry's payments would go, after classification and resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination<'a> {
    /// Wallet id or invoice key of a local wallet.
    Local(&'a str),
    /// Lightning address or LNURL, supplied or discovered. Not verifiable
    /// locally, so only the percent rules apply.
    External(&'a str),
}

/// Result of validating one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Wallet reference to store on the target.
    pub wallet: String,
    /// Running total including this entry.
    pub running_total: Decimal,
}

/// Validates entries of one source wallet.
pub struct TargetValidator<'a> {
    wallets: &'a dyn WalletDirectory,
    source: &'a WalletId,
}

impl<'a> TargetValidator<'a> {
    /// Create a validator for targets of `source`.
    pub fn new(wallets: &'a dyn WalletDirectory, source: &'a WalletId) -> Self {
        Self { wallets, source }
    }

    /// Reject a zero or negative percent at `index`.
    pub fn check_percent(&self, index: usize, entry: &TargetEntry) -> Result<(), SplitError> {
        if entry.percent <= Decimal::ZERO {
            return Err(SplitError::rejected(
                index,
                &entry.wallet,
                ValidationError::InvalidPercent {
                    percent: entry.percent,
                },
            ));
        }
        Ok(())
    }

    /// Validate the entry at `index` against the accumulated `running_total`.
    pub async fn validate(
        &self,
        index: usize,
        entry: &TargetEntry,
        destination: Destination<'_>,
        running_total: Decimal,
    ) -> Result<ValidationOutcome, SplitError> {
        self.check_percent(index, entry)?;
        let reject = |err: ValidationError| SplitError::rejected(index, &entry.wallet, err);

        let wallet = match destination {
            Destination::Local(identifier) => {
                let wallet = self
                    .lookup_local(identifier)
                    .await?
                    .ok_or_else(|| {
                        reject(ValidationError::UnknownWallet {
                            wallet: identifier.to_string(),
                        })
                    })?;
                if &wallet.id == self.source {
                    return Err(reject(ValidationError::SelfSplit));
                }
                wallet.id.0
            }
            Destination::External(address) => address.to_string(),
        };

        let running_total = running_total
            .checked_add(entry.percent)
            .filter(|total| *total <= MAX_TOTAL_PERCENT)
            .ok_or_else(|| {
                reject(ValidationError::OverAllocated {
                    total: running_total.saturating_add(entry.percent),
                })
            })?;

        Ok(ValidationOutcome {
            wallet,
            running_total,
        })
    }

    /// Look a wallet up by id, then by invoice key.
    async fn lookup_local(&self, identifier: &str) -> Result<Option<Wallet>, SplitError> {
        if let Some(wallet) = self.wallets.get_wallet(&WalletId::new(identifier)).await? {
            return Ok(Some(wallet));
        }
        Ok(self
            .wallets
            .get_wallet_for_key(identifier, KeyKind::Invoice)
            .await?)
    }
}
