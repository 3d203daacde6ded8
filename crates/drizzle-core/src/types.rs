//! Core data model: addresses, holder records, allocations, outcomes.
//!
//! All monetary values are unsigned integers in the smallest indivisible
//! unit of the asset in question. Each cycle produces a fresh snapshot of
//! these values; nothing here is retained across cycles.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// An opaque 32-byte ledger address.
///
/// Identifies owners, token accounts, and assets alike. Displayed and
/// parsed as base58.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The zero address (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an address from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| AddressError::InvalidLength(v.len()))?;
        Ok(Self(arr))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Opaque receipt for a submitted transfer, issued by the ledger.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct TransferId(pub [u8; 32]);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for TransferId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| AddressError::InvalidLength(v.len()))?;
        Ok(Self(arr))
    }
}

/// A raw token account as reported by the ledger.
///
/// One owner may control several accounts of the same token; aggregation
/// collapses these into a single [`HolderRecord`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenAccount {
    /// The token account address itself.
    pub account: Address,
    /// The owner controlling the account.
    pub owner: Address,
    /// Balance in token base units.
    pub balance: u64,
}

/// An owner's aggregated balance across all of its token accounts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HolderRecord {
    /// The owner address.
    pub owner: Address,
    /// Aggregated balance in token base units.
    pub balance: u64,
}

/// Result of the eligibility filter: a disjoint, exhaustive partition of
/// the holder set.
#[derive(Clone, Debug, Default)]
pub struct HolderPartition {
    /// Holders with `min_holding <= balance <= max_holding`.
    pub eligible: Vec<HolderRecord>,
    /// Holders below the minimum threshold.
    pub excluded_low: Vec<HolderRecord>,
    /// Holders above the maximum threshold (whales).
    pub excluded_high: Vec<HolderRecord>,
}

impl HolderPartition {
    /// Total number of holders across all three partitions.
    pub fn holder_count(&self) -> usize {
        self.eligible.len() + self.excluded_low.len() + self.excluded_high.len()
    }
}

/// One holder's computed slice of the per-cycle reward.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationEntry {
    /// Recipient owner address.
    pub owner: Address,
    /// The holder's share of the eligible balance, in parts per billion.
    /// Display precision only; `reward` is computed exactly.
    pub share_ppb: u64,
    /// Reward amount in base units of the reward asset. Always nonzero.
    pub reward: u64,
}

/// Outcome of a ledger confirmation wait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Confirmation {
    /// The transfer is irreversibly recorded.
    Confirmed,
    /// The ledger did not reach finality within the wait.
    TimedOut,
    /// The ledger rejected the transfer.
    Rejected(String),
}

/// Terminal status of one allocation entry after execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    /// Transfer confirmed on the ledger.
    Succeeded {
        /// Ledger receipt for the confirmed transfer.
        transfer_id: TransferId,
    },
    /// Transfer gave up after exhausting retries or hitting a permanent error.
    Failed {
        /// Human-readable reason for the failure.
        reason: String,
    },
    /// Transfer was never dispatched (cancellation observed first).
    Skipped,
}

/// Per-entry execution record, consumed by the scheduler for reporting.
#[derive(Clone, Debug)]
pub struct TransferOutcome {
    /// The allocation entry this outcome belongs to.
    pub entry: AllocationEntry,
    /// Terminal status.
    pub status: TransferStatus,
    /// Number of submission attempts made (0 if skipped).
    pub attempts: u32,
    /// Wall time from first dispatch to terminal status.
    pub elapsed: Duration,
}

/// Statistics for one completed cycle.
///
/// Accumulation over outcomes is commutative: `record` may be called in
/// any completion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleStats {
    /// 1-based cycle index.
    pub cycle: u64,
    /// Wall-clock start of the cycle.
    pub started_at: DateTime<Utc>,
    /// Time from entering Scanning to entering Waiting.
    pub duration: Duration,
    /// Holders that passed the eligibility filter.
    pub eligible: usize,
    /// Holders excluded for being below the minimum.
    pub excluded_low: usize,
    /// Holders excluded for being above the maximum.
    pub excluded_high: usize,
    /// Transfers confirmed on the ledger.
    pub succeeded: usize,
    /// Transfers that ended in failure.
    pub failed: usize,
    /// Transfers never dispatched due to cancellation.
    pub skipped: usize,
    /// Sum of confirmed rewards, in reward-asset base units.
    pub total_sent: u64,
}

impl CycleStats {
    /// Start a stats record for a cycle, before execution outcomes exist.
    pub fn new(cycle: u64, started_at: DateTime<Utc>, partition: &HolderPartition) -> Self {
        Self {
            cycle,
            started_at,
            duration: Duration::ZERO,
            eligible: partition.eligible.len(),
            excluded_low: partition.excluded_low.len(),
            excluded_high: partition.excluded_high.len(),
            succeeded: 0,
            failed: 0,
            skipped: 0,
            total_sent: 0,
        }
    }

    /// Fold one transfer outcome into the stats. Order-independent.
    pub fn record(&mut self, outcome: &TransferOutcome) {
        match &outcome.status {
            TransferStatus::Succeeded { .. } => {
                self.succeeded += 1;
                self.total_sent = self.total_sent.saturating_add(outcome.entry.reward);
            }
            TransferStatus::Failed { .. } => self.failed += 1,
            TransferStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Cumulative totals across the process lifetime.
///
/// An explicitly passed accumulator folded by the scheduler after each
/// cycle; returned from the run loop for the final summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Cycles that completed through Reporting.
    pub cycles_completed: u64,
    /// Cycles aborted in Scan/Filter/Allocate or by a pre-flight failure.
    pub cycles_aborted: u64,
    /// Confirmed transfers across all cycles.
    pub transfers_succeeded: u64,
    /// Failed transfers across all cycles.
    pub transfers_failed: u64,
    /// Skipped transfers across all cycles.
    pub transfers_skipped: u64,
    /// Total reward distributed, in reward-asset base units.
    pub total_distributed: u128,
}

impl RunTotals {
    /// Fold one cycle's stats into the running totals.
    pub fn fold(&mut self, stats: &CycleStats) {
        self.cycles_completed += 1;
        self.transfers_succeeded += stats.succeeded as u64;
        self.transfers_failed += stats.failed as u64;
        self.transfers_skipped += stats.skipped as u64;
        self.total_distributed += u128::from(stats.total_sent);
    }
}
