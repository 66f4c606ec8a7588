//! Splitpay CLI
//!
//! Command-line interface for managing split payment targets of local
//! wallets.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use splitpay_lib::storage::JsonFileStore;
use splitpay_lib::SplitConfig;

mod commands;
mod ui;

/// Configuration file looked up inside the storage directory.
const CONFIG_FILE: &str = "config.toml";

#[derive(Parser)]
#[command(name = "splitpay")]
#[command(about = "Splitpay - manage split payment targets of your wallets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Custom storage directory
    #[arg(long, global = true, env = "SPLITPAY_DIR")]
    storage_dir: Option<PathBuf>,

    /// Nostr relay used to resolve npub targets
    #[arg(long, global = true, env = "SPLITPAY_RELAY")]
    relay: Option<String>,

    /// Relay timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how identifiers would be interpreted
    Classify {
        /// Wallet ids, keys, lightning addresses, LNURLs or npubs
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// Look up the lightning address of an npub
    Resolve {
        /// npub, optionally prefixed with nostr:
        npub: String,
    },

    /// Manage local wallets
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Manage the split targets of a wallet
    Targets {
        #[command(subcommand)]
        action: TargetAction,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Create a new wallet
    Create {
        /// Display name
        name: String,
    },

    /// List all wallets
    List,
}

#[derive(Subcommand)]
enum TargetAction {
    /// Show the targets of a wallet
    List {
        /// Source wallet id or name
        source: String,
    },

    /// Replace the targets of a wallet
    Set {
        /// Source wallet id or name
        source: String,

        /// Targets as WALLET=PERCENT or WALLET=PERCENT=ALIAS, in order
        #[arg(required = true)]
        targets: Vec<String>,
    },

    /// Remove all targets of a wallet
    Clear {
        /// Source wallet id or name
        source: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("splitpay_cli=debug,splitpay_lib=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("splitpay_cli=info,splitpay_lib=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    // Setup storage directory
    let storage_dir = cli.storage_dir.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("splitpay")
    });

    let mut config = SplitConfig::load(storage_dir.join(CONFIG_FILE))
        .with_context(|| format!("Failed to load {}", storage_dir.join(CONFIG_FILE).display()))?;
    if let Some(relay) = cli.relay {
        config.relay.url = relay;
    }
    if let Some(timeout) = cli.timeout {
        config.relay.timeout_secs = timeout;
    }
    tracing::debug!(storage = %storage_dir.display(), relay = %config.relay.url, "starting");

    let store = Arc::new(JsonFileStore::new(&storage_dir));
    let output = commands::Output { json: cli.json };

    // Dispatch commands
    match cli.command {
        Commands::Classify { identifiers } => {
            commands::classify::run(&identifiers, output);
        }
        Commands::Resolve { npub } => {
            commands::resolve::run(&config.relay, &npub, output).await?;
        }
        Commands::Wallet { action } => match action {
            WalletAction::Create { name } => {
                commands::wallet::create(&store, &name, output).await?;
            }
            WalletAction::List => {
                commands::wallet::list(&store, output).await?;
            }
        },
        Commands::Targets { action } => match action {
            TargetAction::List { source } => {
                commands::targets::list(config, store, &source, output).await?;
            }
            TargetAction::Set { source, targets } => {
                commands::targets::set(config, store, &source, &targets, output).await?;
            }
            TargetAction::Clear { source, yes } => {
                commands::targets::clear(config, store, &source, yes).await?;
            }
        },
    }

    Ok(())
}
