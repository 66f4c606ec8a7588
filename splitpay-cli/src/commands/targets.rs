//! Targets commands - list, replace and clear split targets

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use rust_decimal::Decimal;
use splitpay_lib::storage::JsonFileStore;
use splitpay_lib::{allocated_percent, SplitConfig, SplitExtension, Target, TargetEntry};

use super::{find_wallet, Output};
use crate::ui;

/// Parse `WALLET=PERCENT` or `WALLET=PERCENT=ALIAS`.
pub fn parse_entry(spec: &str) -> Result<TargetEntry> {
    let mut parts = spec.splitn(3, '=');
    let wallet = parts.next().unwrap_or_default().trim();
    let percent = parts
        .next()
        .ok_or_else(|| anyhow!("Target '{spec}' must look like WALLET=PERCENT"))?
        .trim();
    let alias = parts.next().map(str::trim).filter(|a| !a.is_empty());

    if wallet.is_empty() {
        bail!("Target '{spec}' has no wallet");
    }
    let percent = Decimal::from_str(percent.trim_end_matches('%'))
        .with_context(|| format!("Invalid percent in target '{spec}'"))?;

    let entry = TargetEntry::new(wallet, percent);
    Ok(match alias {
        Some(alias) => entry.with_alias(alias),
        None => entry,
    })
}

pub async fn list(
    config: SplitConfig,
    store: Arc<JsonFileStore>,
    source: &str,
    output: Output,
) -> Result<()> {
    let wallet = find_wallet(&store, source).await?;
    let extension = SplitExtension::new(config, store.clone(), store);
    let targets = extension.list_targets(&wallet.id).await?;
    extension.stop().await;

    if output.json {
        ui::json(&serde_json::to_value(&targets)?);
        return Ok(());
    }

    ui::header(&format!("Targets of '{}'", wallet.name));
    if targets.is_empty() {
        ui::info("No split targets; all payments stay in this wallet");
        return Ok(());
    }
    print_targets(&targets);
    Ok(())
}

pub async fn set(
    config: SplitConfig,
    store: Arc<JsonFileStore>,
    source: &str,
    specs: &[String],
    output: Output,
) -> Result<()> {
    let wallet = find_wallet(&store, source).await?;
    let entries = specs
        .iter()
        .map(|spec| parse_entry(spec))
        .collect::<Result<Vec<_>>>()?;

    let needs_relay = entries
        .iter()
        .any(|entry| splitpay_lib::classify(&entry.wallet).requires_resolution());
    let spinner = (needs_relay && !output.json).then(|| ui::spinner("Resolving nostr profiles..."));

    let extension = SplitExtension::new(config, store.clone(), store);
    let result = extension.replace_targets(&wallet.id, entries).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    extension.stop().await;

    if let Err(err) = result {
        let message = err.user_message();
        if err.is_retryable() {
            ui::warning("The relay may be temporarily unavailable; try again later");
        }
        return Err(anyhow::Error::new(err).context(message));
    }

    let targets = extension.list_targets(&wallet.id).await?;
    if output.json {
        ui::json(&serde_json::to_value(&targets)?);
        return Ok(());
    }

    ui::success(&format!(
        "Saved {} target(s) for '{}'",
        targets.len(),
        wallet.name
    ));
    print_targets(&targets);
    Ok(())
}

pub async fn clear(
    config: SplitConfig,
    store: Arc<JsonFileStore>,
    source: &str,
    yes: bool,
) -> Result<()> {
    let wallet = find_wallet(&store, source).await?;

    if !yes && !ui::confirm(&format!("Remove all targets of '{}'?", wallet.name), false)? {
        ui::info("Cancelled");
        return Ok(());
    }

    let extension = SplitExtension::new(config, store.clone(), store);
    extension.delete_targets(&wallet.id).await?;
    extension.stop().await;

    ui::success(&format!("Removed all targets of '{}'", wallet.name));
    Ok(())
}

fn print_targets(targets: &[Target]) {
    for (i, target) in targets.iter().enumerate() {
        let label = target.alias.as_deref().unwrap_or(&target.wallet_name);
        println!("{}. {} {}%", i + 1, label.bold(), target.percent);
        ui::key_value("Pays to", &target.wallet);
        if target.wallet != target.wallet_name {
            ui::key_value("Entered as", &target.wallet_name);
        }
    }
    ui::separator();
    println!("  Allocated: {}%", allocated_percent(targets));
}
