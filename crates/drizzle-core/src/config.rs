//! Distribution bot configuration.
//!
//! Every knob is enumerated here and validated once at startup; out-of-range
//! values are rejected before the first cycle runs.

use std::time::Duration;

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_MAX_MS, DEFAULT_CONFIRM_TIMEOUT_MS,
    DEFAULT_CYCLE_INTERVAL_SECS, DEFAULT_MAX_CONCURRENT_TRANSFERS, DEFAULT_MAX_HOLDING,
    DEFAULT_MIN_HOLDING, DEFAULT_RETRY_ATTEMPT_CAP, DEFAULT_REWARD_PER_CYCLE,
};
use crate::error::ConfigError;
use crate::types::Address;

/// Configuration for one bot process: one tracked token, one reward asset.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The token whose holder set is analyzed each cycle.
    pub token_address: Address,
    /// The asset distributed as rewards.
    pub reward_asset: Address,
    /// Total reward per cycle, in reward-asset base units (soft target;
    /// floor rounding under-distributes by less than the eligible count).
    pub total_reward_per_cycle: u64,
    /// Interval between cycle starts.
    pub cycle_interval: Duration,
    /// Minimum aggregated holding for eligibility (inclusive).
    pub min_holding: u64,
    /// Maximum aggregated holding for eligibility (inclusive).
    pub max_holding: u64,
    /// Worker pool size for the Execute phase.
    pub max_concurrent_transfers: usize,
    /// Attempts per transfer before recording failure.
    pub retry_attempt_cap: u32,
    /// How long to wait for finality of one submission.
    pub confirm_timeout: Duration,
    /// Delay before the first retry; doubles per attempt.
    pub backoff_base: Duration,
    /// Ceiling on the backoff delay.
    pub backoff_max: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token_address: Address::ZERO,
            reward_asset: Address::ZERO,
            total_reward_per_cycle: DEFAULT_REWARD_PER_CYCLE,
            cycle_interval: Duration::from_secs(DEFAULT_CYCLE_INTERVAL_SECS),
            min_holding: DEFAULT_MIN_HOLDING,
            max_holding: DEFAULT_MAX_HOLDING,
            max_concurrent_transfers: DEFAULT_MAX_CONCURRENT_TRANSFERS,
            retry_attempt_cap: DEFAULT_RETRY_ATTEMPT_CAP,
            confirm_timeout: Duration::from_millis(DEFAULT_CONFIRM_TIMEOUT_MS),
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            backoff_max: Duration::from_millis(DEFAULT_BACKOFF_MAX_MS),
        }
    }
}

impl BotConfig {
    /// Validate the configuration. Called once at startup; a rejection here
    /// is the only configuration-related way the process terminates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_holding >= self.max_holding {
            return Err(ConfigError::ThresholdOrder {
                min: self.min_holding,
                max: self.max_holding,
            });
        }
        if self.total_reward_per_cycle == 0 {
            return Err(ConfigError::ZeroReward);
        }
        if self.cycle_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.max_concurrent_transfers == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.retry_attempt_cap == 0 {
            return Err(ConfigError::ZeroRetryCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(BotConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_interval_is_20s() {
        assert_eq!(
            BotConfig::default().cycle_interval,
            Duration::from_secs(20)
        );
    }

    #[test]
    fn default_retry_cap_is_3() {
        assert_eq!(BotConfig::default().retry_attempt_cap, 3);
    }

    #[test]
    fn rejects_min_equal_to_max() {
        let cfg = BotConfig {
            min_holding: 500,
            max_holding: 500,
            ..BotConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrder { min: 500, max: 500 })
        );
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let cfg = BotConfig {
            min_holding: 1_000_000,
            max_holding: 10,
            ..BotConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn rejects_zero_reward() {
        let cfg = BotConfig {
            total_reward_per_cycle: 0,
            ..BotConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroReward));
    }

    #[test]
    fn rejects_zero_interval() {
        let cfg = BotConfig {
            cycle_interval: Duration::ZERO,
            ..BotConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let cfg = BotConfig {
            max_concurrent_transfers: 0,
            ..BotConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn rejects_zero_retry_cap() {
        let cfg = BotConfig {
            retry_attempt_cap: 0,
            ..BotConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroRetryCap));
    }
}
