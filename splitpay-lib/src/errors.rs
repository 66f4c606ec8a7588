//! Error types for split target operations.
//!
//! Resolution and validation failures are reported per entry and wrapped in
//! [`SplitError::Rejected`], which carries the index and identifier of the
//! entry that aborted the batch. Everything the caller sees falls under one
//! user-facing category, "Cannot set targets.", with the reason as detail.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error codes for FFI and transport integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SplitErrorCode {
    /// Identifier could not be decoded
    MalformedIdentifier = 2000,
    /// Relay connection failed
    Unreachable = 2001,
    /// Relay exchange timed out
    Timeout = 2002,
    /// Relay answered with something unexpected
    Protocol = 2003,
    /// Profile has no lightning address
    NoPayableAddress = 2004,
    /// Percent is not strictly positive
    InvalidPercent = 5000,
    /// Direct identifier names no known wallet
    UnknownWallet = 5001,
    /// Target is the source wallet itself
    SelfSplit = 5002,
    /// Sum of percents exceeds 100
    OverAllocated = 5003,
    /// Storage collaborator error
    Storage = 7000,
}

/// Failure to turn a public-key identity into a payable address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The identifier is not a valid bech32 `npub`.
    #[error("malformed identifier '{identifier}': {reason}")]
    MalformedIdentifier {
        /// Identifier as supplied
        identifier: String,
        /// What went wrong while decoding
        reason: String,
    },

    /// Connecting to the relay failed.
    #[error("relay {relay} unreachable: {reason}")]
    Unreachable {
        /// Relay URL
        relay: String,
        /// Underlying error message
        reason: String,
    },

    /// The relay exchange did not complete in time.
    #[error("relay {relay} timed out after {timeout_ms}ms")]
    Timeout {
        /// Relay URL
        relay: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The relay response did not have the expected shape.
    #[error("relay protocol error: {0}")]
    ProtocolError(String),

    /// The profile carries neither `lud16` nor `lud06`.
    #[error("no payable address in profile of {public_key}")]
    NoPayableAddress {
        /// Hex public key of the profile
        public_key: String,
    },
}

/// An entry broke one of the target set invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Percent must be strictly positive.
    #[error("invalid percent '{percent}'")]
    InvalidPercent {
        /// Offending value
        percent: Decimal,
    },

    /// Neither a wallet id nor an invoice key matched.
    #[error("invalid wallet '{wallet}'")]
    UnknownWallet {
        /// Identifier as supplied
        wallet: String,
    },

    /// A wallet cannot split to itself.
    #[error("can't split to itself")]
    SelfSplit,

    /// Running total went over the ceiling.
    #[error("splitting over 100% (total {total}%)")]
    OverAllocated {
        /// Running total including the offending entry
        total: Decimal,
    },
}

/// Error reported by a storage or wallet-lookup collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Stored data could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Why a single entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Public-key resolution failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Entry broke a target set invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Error returned by target set operations.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The entry at `index` aborted the batch; nothing was persisted.
    #[error("cannot set targets: entry {index} ('{identifier}'): {reason}")]
    Rejected {
        /// Position of the entry in the submitted list
        index: usize,
        /// Identifier as supplied
        identifier: String,
        /// Underlying reason
        #[source]
        reason: RejectReason,
    },

    /// A collaborator failed.
    #[error("cannot set targets: {0}")]
    Storage(#[from] StorageError),
}

impl SplitError {
    pub(crate) fn rejected(index: usize, identifier: &str, reason: impl Into<RejectReason>) -> Self {
        Self::Rejected {
            index,
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    /// Get the error code for FFI/transport integration.
    pub fn code(&self) -> SplitErrorCode {
        match self {
            Self::Rejected { reason, .. } => match reason {
                RejectReason::Resolution(err) => err.code(),
                RejectReason::Validation(err) => err.code(),
            },
            Self::Storage(_) => SplitErrorCode::Storage,
        }
    }

    /// The single user-facing message for every failure of a batch.
    pub fn user_message(&self) -> &'static str {
        "Cannot set targets."
    }

    /// Returns true if resubmitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                reason: RejectReason::Resolution(
                    ResolutionError::Unreachable { .. } | ResolutionError::Timeout { .. }
                ),
                ..
            } | Self::Storage(_)
        )
    }

    /// The rejection reason, if an entry caused the failure.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Rejected { reason, .. } => Some(reason),
            Self::Storage(_) => None,
        }
    }

    /// Index of the entry that aborted the batch.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Rejected { index, .. } => Some(*index),
            Self::Storage(_) => None,
        }
    }
}

impl ResolutionError {
    /// Get the error code for FFI/transport integration.
    pub fn code(&self) -> SplitErrorCode {
        match self {
            Self::MalformedIdentifier { .. } => SplitErrorCode::MalformedIdentifier,
            Self::Unreachable { .. } => SplitErrorCode::Unreachable,
            Self::Timeout { .. } => SplitErrorCode::Timeout,
            Self::ProtocolError(_) => SplitErrorCode::Protocol,
            Self::NoPayableAddress { .. } => SplitErrorCode::NoPayableAddress,
        }
    }

    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn protocol(reason: impl Into<String>) -> Self {
        Self::ProtocolError(reason.into())
    }
}

impl ValidationError {
    /// Get the error code for FFI/transport integration.
    pub fn code(&self) -> SplitErrorCode {
        match self {
            Self::InvalidPercent { .. } => SplitErrorCode::InvalidPercent,
            Self::UnknownWallet { .. } => SplitErrorCode::UnknownWallet,
            Self::SelfSplit => SplitErrorCode::SelfSplit,
            Self::OverAllocated { .. } => SplitErrorCode::OverAllocated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        let err = SplitError::rejected(
            1,
            "def456",
            ValidationError::OverAllocated { total: dec!(110) },
        );
        assert_eq!(err.code(), SplitErrorCode::OverAllocated);
        assert_eq!(err.index(), Some(1));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = SplitError::rejected(0, "bogus", ValidationError::UnknownWallet {
            wallet: "bogus".into(),
        });
        let text = err.to_string();
        assert!(text.starts_with("cannot set targets"));
        assert!(text.contains("invalid wallet 'bogus'"));
        assert_eq!(err.user_message(), "Cannot set targets.");
    }

    #[test]
    fn test_transient_relay_errors_are_retryable() {
        let timeout = SplitError::rejected(
            0,
            "npub1x",
            ResolutionError::Timeout {
                relay: "wss://relay".into(),
                timeout_ms: 5000,
            },
        );
        assert!(timeout.is_retryable());
        assert_eq!(timeout.code(), SplitErrorCode::Timeout);

        let missing = SplitError::rejected(
            0,
            "npub1x",
            ResolutionError::NoPayableAddress {
                public_key: "ab".into(),
            },
        );
        assert!(!missing.is_retryable());
    }

    #[test]
    fn test_storage_conversion() {
        let err: SplitError = StorageError::Backend("disk full".into()).into();
        assert_eq!(err.code(), SplitErrorCode::Storage);
        assert!(err.reason().is_none());
    }
}
