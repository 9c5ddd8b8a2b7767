//! Restart policy after runtime faults.
//!
//! A fault is terminal for the supervisor instance that raised it. With
//! `on-failure` the host builds a fresh instance after an exponential
//! backoff. Startup errors are never restarted.

use std::time::Duration;

use rand::Rng;

use crate::config::{RestartConfig, RestartMode};
use crate::error::SupervisorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub mode: RestartMode,
    pub max_restarts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RestartPolicy {
    pub fn never() -> Self {
        Self::from_config(&RestartConfig::default())
    }

    pub fn from_config(config: &RestartConfig) -> Self {
        Self {
            mode: config.policy,
            max_restarts: config.max_restarts,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms.max(config.base_delay_ms),
        }
    }

    /// Whether to start a new instance after `err`, given restarts so far.
    pub fn should_restart(&self, err: &SupervisorError, restarts: u32) -> bool {
        self.mode == RestartMode::OnFailure && err.is_runtime() && restarts < self.max_restarts
    }

    /// Delay before restart number `attempt` (1-based), with up to 10% jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(32);
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(1u64 << doublings)
            .min(self.max_delay_ms);

        let jitter_ms = match delay_ms / 10 {
            0 => 0,
            spread => rand::thread_rng().gen_range(0..=spread),
        };
        Duration::from_millis(delay_ms + jitter_ms)
    }
}
