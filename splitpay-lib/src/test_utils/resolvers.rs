//! Scripted identity resolver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::ResolutionError;
use crate::nostr::{decode_npub, IdentityResolver, PayableAddress, ResolvedIdentity};

/// Resolver answering from a fixed table instead of a relay.
///
/// Identifiers are decoded first, like the relay resolver does, so a
/// malformed `npub` fails without counting as a lookup. Unknown keys
/// resolve to [`ResolutionError::NoPayableAddress`].
#[derive(Default)]
pub struct StaticResolver {
    answers: Mutex<HashMap<String, Result<PayableAddress, ResolutionError>>>,
    lookups: AtomicUsize,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `npub` with `address`.
    pub fn add_address(&self, npub: &str, address: PayableAddress) {
        self.insert(npub, Ok(address));
    }

    /// Fail lookups of `npub` with `error`.
    pub fn add_error(&self, npub: &str, error: ResolutionError) {
        self.insert(npub, Err(error));
    }

    /// Number of lookups that got past decoding.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn insert(&self, npub: &str, answer: Result<PayableAddress, ResolutionError>) {
        let public_key = decode_npub(npub).expect("fixtures use valid npubs");
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(public_key, answer);
    }
}

#[async_trait]
impl IdentityResolver for StaticResolver {
    async fn resolve(&self, identifier: &str) -> Result<ResolvedIdentity, ResolutionError> {
        let public_key = decode_npub(identifier)?;
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let answer = self
            .answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&public_key)
            .cloned();
        match answer {
            Some(Ok(payable_address)) => Ok(ResolvedIdentity {
                public_key,
                payable_address,
            }),
            Some(Err(err)) => Err(err),
            None => Err(ResolutionError::NoPayableAddress { public_key }),
        }
    }
}
