//! Engine-wide context.
//!
//! Built once by the application and handed to every server and scheduler it
//! constructs.  Nothing in the engine reads process-global state; optional
//! accelerations are switched on or off through [`Capabilities`].

/// Optional engine features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// Reuse trajectories for repeated (start, goal) queries when no other
    /// robot is moving.
    pub trajectory_cache:  bool,
    /// Let planners see other robots' in-flight trajectories.
    pub dynamic_avoidance: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            trajectory_cache:  true,
            dynamic_avoidance: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineContext {
    pub capabilities: Capabilities,
    /// Master seed; the same seed always reproduces the same rollout.
    pub seed:         u64,
}

impl EngineContext {
    pub fn new(seed: u64) -> Self {
        Self { capabilities: Capabilities::default(), seed }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
