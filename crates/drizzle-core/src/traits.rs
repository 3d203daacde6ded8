//! Trait interfaces for the Drizzle engine.
//!
//! These traits define the contracts between crates:
//! - [`LedgerClient`] — read and write access to the remote ledger
//!   (drizzle-ledger implements over JSON-RPC)
//! - [`TransferSigner`] — opaque signing capability for one source account
//!   (drizzle-ledger implements with an ed25519 keypair)
//! - [`CycleReporter`] — sink for per-cycle statistics
//!   (drizzle-engine provides a tracing-backed default)

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CycleError, LedgerError};
use crate::types::{Address, Confirmation, CycleStats, TokenAccount, TransferId};

/// Narrow interface to the remote ledger.
///
/// The core sees only these four operations; transport, request signing,
/// and wire formats live behind the implementation. All four are the only
/// suspension points in a cycle.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// All token accounts of the tracked token, one record per account.
    ///
    /// Fails with [`LedgerError::Connectivity`] or
    /// [`LedgerError::InvalidAddress`].
    async fn token_accounts(&self, token: &Address) -> Result<Vec<TokenAccount>, LedgerError>;

    /// Balance of `asset` held by `owner`, in base units.
    async fn asset_balance(&self, owner: &Address, asset: &Address) -> Result<u64, LedgerError>;

    /// Submit a transfer of `amount` base units of `asset` from `source`
    /// to `dest`, authorized by `signer`. Returns the ledger receipt.
    ///
    /// Fails with [`LedgerError::Submission`]; the embedded
    /// [`FailureKind`](crate::error::FailureKind) distinguishes transient
    /// from permanent rejections.
    async fn submit_transfer(
        &self,
        source: &Address,
        dest: &Address,
        asset: &Address,
        amount: u64,
        signer: &dyn TransferSigner,
    ) -> Result<TransferId, LedgerError>;

    /// Wait up to `timeout` for the transfer to reach finality.
    async fn await_confirmation(
        &self,
        id: &TransferId,
        timeout: Duration,
    ) -> Result<Confirmation, LedgerError>;
}

/// Opaque capability to authorize transfers from one source account.
///
/// No raw key material crosses this boundary; the core only ever sees the
/// source address and finished signatures.
pub trait TransferSigner: Send + Sync {
    /// The source account this signer controls.
    fn source(&self) -> Address;

    /// Sign an opaque payload digest, returning a 64-byte signature.
    fn sign(&self, payload: &[u8]) -> [u8; 64];
}

/// Sink for cycle-level reporting.
pub trait CycleReporter: Send + Sync {
    /// A cycle ran to completion (possibly with individual failures).
    fn cycle_complete(&self, stats: &CycleStats);

    /// A cycle was aborted before execution finished.
    fn cycle_aborted(&self, cycle: u64, err: &CycleError);
}
