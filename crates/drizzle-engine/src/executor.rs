//! Batch transfer execution with bounded concurrency and retry.
//!
//! Entries are dispatched in input order through a semaphore-bounded worker
//! pool; completion order is unconstrained. Submissions against the single
//! source account are sequenced by a submit lock even when attempts run
//! concurrently, mirroring the ledger's per-account ordering requirement.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use drizzle_core::allocation::allocated_total;
use drizzle_core::config::BotConfig;
use drizzle_core::error::{CycleError, LedgerError};
use drizzle_core::traits::{LedgerClient, TransferSigner};
use drizzle_core::types::{
    Address, AllocationEntry, Confirmation, TransferOutcome, TransferStatus,
};

use crate::retry::Backoff;

/// Execution-phase tunables, extracted from [`BotConfig`].
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Worker pool size (in-flight transfer cap).
    pub max_concurrent: usize,
    /// Attempts per entry before recording failure.
    pub retry_cap: u32,
    /// Delay before the first retry.
    pub backoff_base: Duration,
    /// Ceiling on the backoff delay.
    pub backoff_max: Duration,
    /// Finality wait per submission.
    pub confirm_timeout: Duration,
}

impl From<&BotConfig> for ExecutorConfig {
    fn from(config: &BotConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent_transfers,
            retry_cap: config.retry_attempt_cap,
            backoff_base: config.backoff_base,
            backoff_max: config.backoff_max,
            confirm_timeout: config.confirm_timeout,
        }
    }
}

/// Executes one cycle's allocation as a batch of transfer attempts.
pub struct TransferExecutor<L> {
    ledger: Arc<L>,
    signer: Arc<dyn TransferSigner>,
    config: ExecutorConfig,
    /// Sequences submissions from the shared source account. Held across
    /// the submit call only, never across the confirmation wait.
    submit_lock: Arc<Mutex<()>>,
}

impl<L: LedgerClient + 'static> TransferExecutor<L> {
    /// Create an executor over the given ledger and signer.
    pub fn new(ledger: Arc<L>, signer: Arc<dyn TransferSigner>, config: ExecutorConfig) -> Self {
        Self {
            ledger,
            signer,
            config,
            submit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Execute the allocation, returning one outcome per entry.
    ///
    /// Pre-flight: if the batch total exceeds the source account's
    /// reward-asset balance, the whole batch is aborted before any transfer
    /// is dispatched. `running` is the process-wide cancellation flag:
    /// once cleared, no further entries are dispatched (they are recorded
    /// `Skipped`) but attempts already in flight run to completion.
    pub async fn execute(
        &self,
        reward_asset: Address,
        entries: Vec<AllocationEntry>,
        running: Arc<AtomicBool>,
    ) -> Result<Vec<TransferOutcome>, CycleError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let source = self.signer.source();
        let need = allocated_total(&entries);
        let have = self.ledger.asset_balance(&source, &reward_asset).await?;
        if need > u128::from(have) {
            return Err(CycleError::InsufficientBalance { have, need });
        }

        info!(
            recipients = entries.len(),
            total = %need,
            balance = have,
            concurrency = self.config.max_concurrent,
            "executing transfer batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut workers: JoinSet<TransferOutcome> = JoinSet::new();
        let mut outcomes: Vec<TransferOutcome> = Vec::with_capacity(entries.len());

        for entry in entries {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            // Read after the permit wait so a stop during a long batch
            // also skips the entries still queued behind the pool.
            if !running.load(Ordering::Relaxed) {
                drop(permit);
                outcomes.push(TransferOutcome {
                    entry,
                    status: TransferStatus::Skipped,
                    attempts: 0,
                    elapsed: Duration::ZERO,
                });
                continue;
            }

            let ledger = Arc::clone(&self.ledger);
            let signer = Arc::clone(&self.signer);
            let submit_lock = Arc::clone(&self.submit_lock);
            let config = self.config.clone();

            workers.spawn(async move {
                let outcome =
                    run_entry(ledger, signer, submit_lock, source, reward_asset, entry, config)
                        .await;
                drop(permit);
                outcome
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!("transfer worker task failed: {e}"),
            }
        }

        Ok(outcomes)
    }
}

/// Drive one allocation entry to a terminal status.
///
/// Transient failures (connectivity, transient submission errors,
/// confirmation timeouts) are retried with exponential backoff up to the
/// attempt cap; permanent failures and ledger rejections end the entry
/// immediately. Each terminal outcome is logged as it happens.
async fn run_entry<L: LedgerClient>(
    ledger: Arc<L>,
    signer: Arc<dyn TransferSigner>,
    submit_lock: Arc<Mutex<()>>,
    source: Address,
    asset: Address,
    entry: AllocationEntry,
    config: ExecutorConfig,
) -> TransferOutcome {
    let started = Instant::now();
    let mut backoff = Backoff::new(config.retry_cap, config.backoff_base, config.backoff_max);

    let status = loop {
        let submitted = {
            let _guard = submit_lock.lock().await;
            ledger
                .submit_transfer(&source, &entry.owner, &asset, entry.reward, signer.as_ref())
                .await
        };

        let failure = match submitted {
            Ok(id) => match ledger.await_confirmation(&id, config.confirm_timeout).await {
                Ok(Confirmation::Confirmed) => {
                    break TransferStatus::Succeeded { transfer_id: id };
                }
                Ok(Confirmation::Rejected(reason)) => {
                    break TransferStatus::Failed {
                        reason: format!("rejected by ledger: {reason}"),
                    };
                }
                Ok(Confirmation::TimedOut) => LedgerError::ConfirmationTimeout(id),
                Err(e) => e,
            },
            Err(e) => e,
        };

        if !failure.is_transient() {
            break TransferStatus::Failed {
                reason: failure.to_string(),
            };
        }

        match backoff.next_delay() {
            Some(delay) => {
                warn!(
                    owner = %entry.owner,
                    next_attempt = backoff.attempt(),
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    "transfer attempt failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                break TransferStatus::Failed {
                    reason: format!("{failure} (gave up after {} attempts)", backoff.attempt()),
                };
            }
        }
    };

    let attempts = backoff.attempt();
    let elapsed = started.elapsed();
    match &status {
        TransferStatus::Succeeded { transfer_id } => info!(
            owner = %entry.owner,
            reward = entry.reward,
            attempts,
            transfer_id = %transfer_id,
            "transfer confirmed"
        ),
        TransferStatus::Failed { reason } => warn!(
            owner = %entry.owner,
            reward = entry.reward,
            attempts,
            reason = %reason,
            "transfer failed"
        ),
        TransferStatus::Skipped => {}
    }

    TransferOutcome {
        entry,
        status,
        attempts,
        elapsed,
    }
}
