//! Classify command - show how identifiers are interpreted

use serde_json::json;
use splitpay_lib::{classify, IdentifierKind};

use super::Output;
use crate::ui;

pub fn run(identifiers: &[String], output: Output) {
    let classified: Vec<(&str, IdentifierKind)> = identifiers
        .iter()
        .map(|identifier| (identifier.as_str(), classify(identifier)))
        .collect();

    if output.json {
        let rows: Vec<_> = classified
            .iter()
            .map(|(identifier, kind)| {
                json!({
                    "identifier": identifier,
                    "kind": kind.as_str(),
                    "requires_resolution": kind.requires_resolution(),
                })
            })
            .collect();
        ui::json(&json!(rows));
        return;
    }

    ui::header("Identifiers");
    for (identifier, kind) in classified {
        let note = match kind {
            IdentifierKind::Direct => "local wallet id or invoice key",
            IdentifierKind::EmailAddress => "lightning address, paid externally",
            IdentifierKind::UrlScheme => "LNURL, paid externally",
            IdentifierKind::PublicKey => "nostr profile, resolved via relay",
        };
        ui::key_value(identifier, &format!("{kind} ({note})"));
    }
}
