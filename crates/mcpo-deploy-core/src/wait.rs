//! Readiness wait policy (exponential backoff).
//!
//! Applied only to the readiness query after instance creation; mutating
//! calls are never retried.

/// Bounded exponential backoff configuration.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay_ms: 5_000,
            max_delay_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

impl WaitConfig {
    /// Zero-delay policy for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            multiplier: 1.0,
        }
    }

    /// Delay before the given attempt (0-based), capped at `max_delay_ms`.
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_up_to_cap() {
        let config = WaitConfig {
            max_attempts: 5,
            initial_delay_ms: 1000,
            max_delay_ms: 10000,
            multiplier: 2.0,
        };

        assert_eq!(config.delay_for_attempt(0), 1000);
        assert_eq!(config.delay_for_attempt(1), 2000);
        assert_eq!(config.delay_for_attempt(2), 4000);
        assert_eq!(config.delay_for_attempt(3), 8000);
        assert_eq!(config.delay_for_attempt(4), 10000); // capped
    }

    #[test]
    fn immediate_policy_has_no_delay() {
        let config = WaitConfig::immediate(3);
        assert_eq!(config.delay_for_attempt(0), 0);
        assert_eq!(config.delay_for_attempt(2), 0);
    }
}
