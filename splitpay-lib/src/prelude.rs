//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use splitpay_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Core types: `WalletId`, `Wallet`, `TargetEntry`, `Target`
//! - Error types: `SplitError`, `SplitErrorCode`, `Result`
//! - Collaborator traits: `TargetStore`, `WalletDirectory`, `IdentityResolver`
//! - Engine: `TargetSetManager`, `SplitExtension`, `RelayResolver`
//! - The `dec!` macro for percent literals

// Core types
pub use crate::{allocated_percent, KeyKind, Target, TargetEntry, Wallet, WalletId};

// Error handling
pub use crate::errors::{RejectReason, SplitError, SplitErrorCode};
pub use crate::Result;

// Classification
pub use crate::identifier::{classify, IdentifierKind};

// Collaborators
pub use crate::nostr::{IdentityResolver, PayableAddress, RelayResolver, ResolvedIdentity};
pub use crate::storage::{TargetStore, WalletDirectory};

// Engine
pub use crate::config::{RelayConfig, SplitConfig};
pub use crate::extension::SplitExtension;
pub use crate::manager::TargetSetManager;
pub use crate::tasks::{ShutdownSignal, StopReport, TaskError, TaskRegistry};

// Percent literals
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
