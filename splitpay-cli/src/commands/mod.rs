//! CLI command implementations

use anyhow::{bail, Result};
use splitpay_lib::storage::JsonFileStore;
use splitpay_lib::Wallet;

pub mod classify;
pub mod resolve;
pub mod targets;
pub mod wallet;

/// Output mode shared by all commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Output {
    pub json: bool,
}

/// Find a wallet by id, falling back to a unique name match.
pub async fn find_wallet(store: &JsonFileStore, reference: &str) -> Result<Wallet> {
    let wallets = store.list_wallets().await?;
    if let Some(wallet) = wallets.iter().find(|w| w.id.as_str() == reference) {
        return Ok(wallet.clone());
    }

    let mut named = wallets.into_iter().filter(|w| w.name == reference);
    match (named.next(), named.next()) {
        (Some(wallet), None) => Ok(wallet),
        (Some(_), Some(_)) => bail!("Several wallets are named '{reference}', use the wallet id"),
        (None, _) => bail!("No wallet '{reference}'. Run 'splitpay wallet list' to see wallets."),
    }
}
