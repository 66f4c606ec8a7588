//! Assertion helpers for target set results.

use std::fmt::Debug;

use rust_decimal::Decimal;

use crate::errors::SplitErrorCode;
use crate::{Result, Target};

/// Assert that a batch was rejected at `index` with `code`.
///
/// # Panics
/// Panics if the result is `Ok` or carries another index or code.
pub fn assert_rejected<T: Debug>(result: &Result<T>, index: usize, code: SplitErrorCode) {
    match result {
        Ok(value) => panic!("expected rejection at entry {index}, got {value:?}"),
        Err(err) => {
            assert_eq!(err.index(), Some(index), "wrong entry rejected: {err}");
            assert_eq!(err.code(), code, "wrong rejection code: {err}");
        }
    }
}

/// Assert that `targets` hold exactly the `(wallet, percent)` pairs, in order.
///
/// # Panics
/// Panics on any difference.
pub fn assert_committed(targets: &[Target], expected: &[(&str, Decimal)]) {
    let actual: Vec<_> = targets
        .iter()
        .map(|t| (t.wallet.as_str(), t.percent))
        .collect();
    assert_eq!(actual, expected, "committed targets differ");
}
