//! Wallet commands - create and list local wallets

use anyhow::{Context, Result};
use colored::Colorize;
use splitpay_lib::storage::JsonFileStore;

use super::Output;
use crate::ui;

pub async fn create(store: &JsonFileStore, name: &str, output: Output) -> Result<()> {
    let wallet = store
        .create_wallet(name)
        .await
        .context("Failed to create wallet")?;
    tracing::info!(wallet = %wallet.id, "created wallet");

    if output.json {
        ui::json(&serde_json::to_value(&wallet)?);
        return Ok(());
    }

    ui::success(&format!("Created wallet '{}'", wallet.name));
    ui::key_value("Id", wallet.id.as_str());
    ui::key_value("Invoice key", &wallet.invoice_key);
    ui::key_value("Admin key", &wallet.admin_key);
    Ok(())
}

pub async fn list(store: &JsonFileStore, output: Output) -> Result<()> {
    let wallets = store.list_wallets().await?;

    if output.json {
        ui::json(&serde_json::to_value(&wallets)?);
        return Ok(());
    }

    ui::header("Wallets");
    if wallets.is_empty() {
        ui::info("No wallets found");
        ui::info("Run 'splitpay wallet create <name>' to create one");
        return Ok(());
    }

    for wallet in wallets {
        println!("{}", wallet.name.green().bold());
        ui::key_value("Id", wallet.id.as_str());
        ui::key_value("Invoice key", &wallet.invoice_key);
    }
    Ok(())
}
