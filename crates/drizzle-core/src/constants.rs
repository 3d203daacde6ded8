//! Protocol and configuration constants.

/// Fixed-point precision for holder shares: parts per billion.
///
/// Nine significant digits of relative precision for reported shares.
/// Reward amounts themselves are computed with exact u128 rational
/// arithmetic and do not depend on this constant.
pub const SHARE_PRECISION: u64 = 1_000_000_000;

/// Default seconds between cycle starts.
pub const DEFAULT_CYCLE_INTERVAL_SECS: u64 = 20;

/// Default total reward dispensed per cycle, in base units of the reward
/// asset (0.2 of an 8-decimal asset).
pub const DEFAULT_REWARD_PER_CYCLE: u64 = 20_000_000;

/// Default minimum aggregated holding for eligibility, in token base units.
pub const DEFAULT_MIN_HOLDING: u64 = 1_000;

/// Default maximum aggregated holding for eligibility (whale cutoff).
pub const DEFAULT_MAX_HOLDING: u64 = 10_000_000;

/// Default number of concurrent in-flight transfers.
///
/// Kept single-digit to respect typical public RPC rate limits.
pub const DEFAULT_MAX_CONCURRENT_TRANSFERS: usize = 4;

/// Default cap on attempts per transfer (first try plus retries).
pub const DEFAULT_RETRY_ATTEMPT_CAP: u32 = 3;

/// Default timeout for a single confirmation wait, in milliseconds.
pub const DEFAULT_CONFIRM_TIMEOUT_MS: u64 = 30_000;

/// Default base delay before the first retry, in milliseconds.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Default ceiling on the exponential backoff delay, in milliseconds.
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 8_000;
