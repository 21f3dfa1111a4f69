/*
[INPUT]:  Attempt counter and backoff bounds
[OUTPUT]: Delay before the next attempt
[POS]:    HTTP layer - bounded exponential backoff for transient fetches
[UPDATE]: When changing retry limits or backoff curve
*/

use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_MIN_DELAY_MS: u64 = 200;
const DEFAULT_MAX_DELAY_MS: u64 = 2_000;

/// Configuration for retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Extra attempts after the first one
    pub max_retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_delay: Duration::from_millis(DEFAULT_MIN_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Exponential backoff: min_delay * 2^attempt, capped at max_delay
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.min_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;

        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(base.saturating_mul(factor).min(cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 200)]
    #[case(1, 400)]
    #[case(2, 800)]
    #[case(3, 1_600)]
    #[case(4, 2_000)]
    #[case(70, 2_000)]
    fn test_backoff_is_capped(#[case] attempt: u32, #[case] expected_ms: u64) {
        let config = RetryConfig::default();
        assert_eq!(config.backoff(attempt), Duration::from_millis(expected_ms));
    }

    #[test]
    fn test_disabled_has_no_retries() {
        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }
}
