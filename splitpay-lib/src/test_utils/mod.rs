//! Test utilities for split targets.
//!
//! This module provides:
//! - A ready-made [`TestContext`] with in-memory collaborators and a few wallets
//! - A scripted [`StaticResolver`] that never touches the network
//! - Deterministic `npub` fixtures
//! - Assertion helpers for rejected batches
//!
//! ## Usage
//!
//! ```rust,ignore
//! use splitpay_lib::test_utils::{assert_rejected, test_npub, TestContext};
//!
//! let ctx = TestContext::new();
//! let result = ctx
//!     .manager
//!     .set_targets(&ctx.source, vec![TargetEntry::new("abc123", dec!(120))])
//!     .await;
//! assert_rejected(&result, 0, SplitErrorCode::OverAllocated);
//! ```

mod assertions;
mod fixtures;
mod resolvers;

pub use assertions::{assert_committed, assert_rejected};
pub use fixtures::{test_npub, test_public_key, test_wallet, TestContext, TestFixtures};
pub use resolvers::StaticResolver;
