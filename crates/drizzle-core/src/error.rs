//! Error types for the Drizzle distribution engine.
use std::fmt;

use thiserror::Error;

use crate::types::TransferId;

/// Whether a failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Retryable at the call site that observed it.
    Transient,
    /// Retrying cannot help (invalid destination, rejected payload).
    Permanent,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transient => write!(f, "transient"),
            FailureKind::Permanent => write!(f, "permanent"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58: {0}")] InvalidBase58(String),
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid length: {0} bytes, expected 32")] InvalidLength(usize),
}

/// Failures surfaced by the ledger client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("connectivity: {0}")] Connectivity(String),
    #[error("invalid address: {0}")] InvalidAddress(String),
    #[error("submission failed ({kind}): {reason}")] Submission { kind: FailureKind, reason: String },
    #[error("confirmation timed out for transfer {0}")] ConfirmationTimeout(TransferId),
}

impl LedgerError {
    /// Whether the retry policy applies to this failure.
    ///
    /// Connectivity problems, transient submission errors, and confirmation
    /// timeouts are retried; invalid addresses and permanent rejections
    /// fail immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            LedgerError::Connectivity(_) => true,
            LedgerError::ConfirmationTimeout(_) => true,
            LedgerError::Submission { kind, .. } => *kind == FailureKind::Transient,
            LedgerError::InvalidAddress(_) => false,
        }
    }
}

/// Failures that abort a whole cycle.
///
/// The scheduler logs these, counts the cycle as aborted, and proceeds to
/// Waiting; they never terminate the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    /// The source account cannot cover the full batch. Surfaced before any
    /// transfer is dispatched.
    #[error("insufficient reward balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u128 },

    /// A Scan/Filter/Allocate phase failure, propagated from the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Startup configuration rejections. Fatal: the process refuses to run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_holding {min} must be strictly below max_holding {max}")]
    ThresholdOrder { min: u64, max: u64 },
    #[error("total reward per cycle must be nonzero")]
    ZeroReward,
    #[error("cycle interval must be nonzero")]
    ZeroInterval,
    #[error("max concurrent transfers must be nonzero")]
    ZeroConcurrency,
    #[error("retry attempt cap must be nonzero")]
    ZeroRetryCap,
}
