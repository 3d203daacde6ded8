//! # drizzle-engine
//! Execution half of the Drizzle pipeline: the bounded-concurrency
//! [`TransferExecutor`] and the fixed-interval [`CycleScheduler`].

pub mod executor;
pub mod retry;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_util;

pub use executor::{ExecutorConfig, TransferExecutor};
pub use scheduler::{CyclePhase, CycleScheduler, LogReporter};
