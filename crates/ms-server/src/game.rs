//! Static game definition: field, interactables, timing, rules.

use std::sync::Arc;

use ms_core::MatchTiming;
use ms_interact::{Interactable, InteractionRegistry};
use ms_motion::Obstacle;

use crate::{MatchRule, ServerError, ServerResult};

/// Everything about a game that does not change during a match.
///
/// Shared read-only between every server built from it, usually behind an
/// `Arc`.
pub struct Game {
    pub name:         String,
    /// Field extent along x, metres.
    pub field_width:  f64,
    /// Field extent along y, metres.
    pub field_height: f64,
    pub obstacles:    Vec<Obstacle>,
    pub timing:       MatchTiming,
    registry:         InteractionRegistry,
    rules:            Vec<Arc<dyn MatchRule>>,
}

impl Game {
    pub fn new(name: impl Into<String>, field_width: f64, field_height: f64) -> Self {
        Self {
            name: name.into(),
            field_width,
            field_height,
            obstacles: Vec::new(),
            timing: MatchTiming::default(),
            registry: InteractionRegistry::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn with_timing(mut self, timing: MatchTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_interactable(mut self, interactable: Interactable) -> ServerResult<Self> {
        self.registry.register(interactable)?;
        Ok(self)
    }

    pub fn with_rule(mut self, rule: impl MatchRule) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &[Arc<dyn MatchRule>] {
        &self.rules
    }

    pub(crate) fn validate(&self) -> ServerResult<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.field_width) || !ok(self.field_height) {
            return Err(ServerError::Config(format!(
                "field {}×{} must have positive size",
                self.field_width, self.field_height
            )));
        }
        if self.timing.auto_secs + self.timing.teleop_secs == 0 {
            return Err(ServerError::Config("match has zero length".into()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("name", &self.name)
            .field("field", &(self.field_width, self.field_height))
            .field("obstacles", &self.obstacles.len())
            .field("interactables", &self.registry.len())
            .field("rules", &self.rules.len())
            .finish()
    }
}
