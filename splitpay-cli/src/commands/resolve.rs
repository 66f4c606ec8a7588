//! Resolve command - look up the payable address of an npub

use anyhow::{Context, Result};
use serde_json::json;
use splitpay_lib::{IdentityResolver, RelayConfig, RelayResolver};

use super::Output;
use crate::ui;

pub async fn run(relay: &RelayConfig, npub: &str, output: Output) -> Result<()> {
    let resolver = RelayResolver::new(relay.clone());

    let spinner = (!output.json).then(|| ui::spinner(&format!("Querying {}...", relay.url)));
    let result = resolver.resolve(npub).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let resolved = result.with_context(|| format!("Failed to resolve {npub}"))?;

    if output.json {
        ui::json(&json!({
            "public_key": resolved.public_key,
            "payable_address": resolved.payable_address.as_str(),
        }));
        return Ok(());
    }

    ui::success("Profile found");
    ui::key_value("Public key", &resolved.public_key);
    ui::key_value("Pays to", resolved.payable_address.as_str());
    Ok(())
}
