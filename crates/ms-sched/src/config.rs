//! Scheduler configuration.

use crate::{SchedError, SchedResult};

#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Time a WAIT (or a failed action) keeps an agent busy, ms.
    pub wait_quantum_ms:        u64,
    /// Truncate the episode after this many steps.  `None` runs until the
    /// match is over.
    pub max_episode_steps:      Option<u64>,
    /// Added to an agent's reward whenever its action is invalid.
    pub invalid_action_penalty: f64,
    /// `true`: jump the clock to the next completion event after each step.
    /// `false`: advance by one wait quantum per step.
    pub event_stepping:         bool,
    /// Seed handed to policies at episode start.
    pub seed:                   u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            wait_quantum_ms:        100,
            max_episode_steps:      None,
            invalid_action_penalty: -1.0,
            event_stepping:         true,
            seed:                   0,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> SchedResult<()> {
        if self.wait_quantum_ms == 0 {
            return Err(SchedError::Config("wait quantum must be at least 1 ms".into()));
        }
        if self.max_episode_steps == Some(0) {
            return Err(SchedError::Config("max_episode_steps must be positive".into()));
        }
        if !self.invalid_action_penalty.is_finite() {
            return Err(SchedError::Config("invalid_action_penalty must be finite".into()));
        }
        Ok(())
    }
}
