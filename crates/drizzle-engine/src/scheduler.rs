//! Fixed-interval cycle scheduling.
//!
//! The scheduler drives the per-cycle pipeline sequentially — Scan →
//! Filter → Allocate — then fans out to the executor's worker pool and
//! fans back in before Reporting. A cleared running flag is observed at
//! phase boundaries and never interrupts transfers already in flight.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info};

use drizzle_core::allocation::{self, allocated_total};
use drizzle_core::config::BotConfig;
use drizzle_core::eligibility;
use drizzle_core::error::CycleError;
use drizzle_core::holders;
use drizzle_core::traits::{CycleReporter, LedgerClient};
use drizzle_core::types::{CycleStats, RunTotals};

use crate::executor::TransferExecutor;

/// Scheduler phase. One cycle walks Scanning through Waiting in order;
/// `Stopped` is terminal and entered only at a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Scanning,
    Filtering,
    Allocating,
    Executing,
    Reporting,
    Waiting,
    Stopped,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Scanning => "scanning",
            CyclePhase::Filtering => "filtering",
            CyclePhase::Allocating => "allocating",
            CyclePhase::Executing => "executing",
            CyclePhase::Reporting => "reporting",
            CyclePhase::Waiting => "waiting",
            CyclePhase::Stopped => "stopped",
        };
        write!(f, "{name}")
    }
}

/// Default reporter: cycle summaries through `tracing`.
pub struct LogReporter;

impl CycleReporter for LogReporter {
    fn cycle_complete(&self, stats: &CycleStats) {
        info!(
            cycle = stats.cycle,
            duration_ms = stats.duration.as_millis() as u64,
            eligible = stats.eligible,
            excluded_low = stats.excluded_low,
            excluded_high = stats.excluded_high,
            succeeded = stats.succeeded,
            failed = stats.failed,
            skipped = stats.skipped,
            total_sent = stats.total_sent,
            "cycle complete"
        );
    }

    fn cycle_aborted(&self, cycle: u64, err: &CycleError) {
        error!(cycle, error = %err, "cycle aborted");
    }
}

/// Drives the distribution pipeline on a fixed interval.
pub struct CycleScheduler<L> {
    ledger: Arc<L>,
    executor: TransferExecutor<L>,
    config: BotConfig,
    reporter: Arc<dyn CycleReporter>,
    running: Arc<AtomicBool>,
    phase: CyclePhase,
    cycle: u64,
}

impl<L: LedgerClient + 'static> CycleScheduler<L> {
    /// Create a scheduler reporting through [`LogReporter`].
    pub fn new(
        ledger: Arc<L>,
        executor: TransferExecutor<L>,
        config: BotConfig,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            ledger,
            executor,
            config,
            reporter: Arc::new(LogReporter),
            running,
            phase: CyclePhase::Idle,
            cycle: 0,
        }
    }

    /// Replace the reporting sink.
    pub fn with_reporter(mut self, reporter: Arc<dyn CycleReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    fn enter(&mut self, phase: CyclePhase) {
        debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    fn stop_requested(&self) -> bool {
        !self.running.load(Ordering::Relaxed)
    }

    /// Run cycles until the running flag is cleared, then return the
    /// cumulative totals for the final summary.
    ///
    /// A cycle that fails in Scan/Filter/Allocate or pre-flight is logged
    /// and counted as aborted; the loop always proceeds to Waiting and
    /// tries again next interval. Only the cancellation flag ends the loop.
    pub async fn run(&mut self) -> RunTotals {
        let mut totals = RunTotals::default();

        while !self.stop_requested() {
            self.cycle += 1;
            let cycle_started = Instant::now();

            match self.run_cycle().await {
                Ok(Some(stats)) => {
                    self.reporter.cycle_complete(&stats);
                    totals.fold(&stats);
                }
                Ok(None) => break, // stop observed at a phase boundary
                Err(e) => {
                    totals.cycles_aborted += 1;
                    self.reporter.cycle_aborted(self.cycle, &e);
                }
            }

            self.enter(CyclePhase::Waiting);
            self.wait_out_interval(cycle_started).await;
        }

        self.enter(CyclePhase::Stopped);
        info!(
            cycles = totals.cycles_completed,
            aborted = totals.cycles_aborted,
            "scheduler stopped"
        );
        totals
    }

    /// One full pass of the pipeline.
    ///
    /// `Ok(None)` means the stop request was observed before Executing and
    /// the cycle was abandoned without side effects.
    async fn run_cycle(&mut self) -> Result<Option<CycleStats>, CycleError> {
        let started_at = Utc::now();
        let scan_started = Instant::now();
        info!(cycle = self.cycle, "starting distribution cycle");

        self.enter(CyclePhase::Scanning);
        let accounts = self
            .ledger
            .token_accounts(&self.config.token_address)
            .await?;
        debug!(cycle = self.cycle, accounts = accounts.len(), "scanned token accounts");
        let holder_set = holders::aggregate(&accounts);
        if self.stop_requested() {
            return Ok(None);
        }

        self.enter(CyclePhase::Filtering);
        let partition = eligibility::partition(
            holder_set,
            self.config.min_holding,
            self.config.max_holding,
        );
        info!(
            cycle = self.cycle,
            eligible = partition.eligible.len(),
            excluded_low = partition.excluded_low.len(),
            excluded_high = partition.excluded_high.len(),
            "filtered holders"
        );
        if self.stop_requested() {
            return Ok(None);
        }

        self.enter(CyclePhase::Allocating);
        let entries =
            allocation::allocate(&partition.eligible, self.config.total_reward_per_cycle);
        info!(
            cycle = self.cycle,
            recipients = entries.len(),
            planned = %allocated_total(&entries),
            "computed allocation"
        );
        for entry in entries.iter().take(10) {
            debug!(
                owner = %entry.owner,
                reward = entry.reward,
                share_ppb = entry.share_ppb,
                "planned recipient"
            );
        }
        if self.stop_requested() {
            return Ok(None);
        }

        self.enter(CyclePhase::Executing);
        let outcomes = if entries.is_empty() {
            info!(cycle = self.cycle, "nothing to distribute this cycle");
            Vec::new()
        } else {
            self.executor
                .execute(self.config.reward_asset, entries, Arc::clone(&self.running))
                .await?
        };

        self.enter(CyclePhase::Reporting);
        let mut stats = CycleStats::new(self.cycle, started_at, &partition);
        for outcome in &outcomes {
            stats.record(outcome);
        }
        stats.duration = scan_started.elapsed();
        Ok(Some(stats))
    }

    /// Sleep out the remainder of the interval, in short slices so a stop
    /// request is honored promptly. An over-long cycle gets no sleep at
    /// all: the next cycle starts immediately rather than compounding
    /// delay.
    async fn wait_out_interval(&self, cycle_started: Instant) {
        let deadline = cycle_started + self.config.cycle_interval;
        while !self.stop_requested() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let slice = (deadline - now).min(Duration::from_millis(250));
            tokio::time::sleep(slice).await;
        }
    }
}
