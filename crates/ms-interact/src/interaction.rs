//! The `Interaction` trait — the extension point for game rules.

use ms_core::Pose;
use ms_state::ValueChange;

use crate::{EffectScope, InteractError, InteractResult};

/// One thing a robot can do to an interactable.
///
/// Implementations must be `Send + Sync` because a registry is shared by
/// every server built from the same game, including pooled servers on other
/// threads.
///
/// # Contract
///
/// - [`effect`][Self::effect] is pure: it reads the scope and returns a
///   journal.  Return [`InteractError::Infeasible`] when the current state
///   does not allow the action; the server then applies nothing.
/// - Validate before emitting.  Changes are applied best-effort, so a journal
///   whose third change fails leaves the first two in place.
pub trait Interaction: Send + Sync + 'static {
    fn description(&self) -> &str {
        ""
    }

    /// Seconds the robot spends at the target performing this interaction.
    fn duration_estimate(&self, scope: &EffectScope<'_>) -> f64;

    /// Compute the journal for this interaction.
    fn effect(&self, scope: &EffectScope<'_>) -> InteractResult<Vec<ValueChange>>;

    /// Where the robot must stand.  `None` uses the interactable's point.
    fn navigation_point(&self) -> Option<Pose> {
        None
    }
}

type Condition = Box<dyn Fn(&EffectScope<'_>) -> bool + Send + Sync>;
type Effect = Box<dyn Fn(&EffectScope<'_>) -> InteractResult<Vec<ValueChange>> + Send + Sync>;

/// An [`Interaction`] assembled from closures.
///
/// ```rust,ignore
/// let tap = FnInteraction::new("press the button", 0.5, |s| {
///     Ok(vec![ValueChange::increase(s.target.cell("presses"), 1i64)])
/// })
/// .when(|s| s.target.int("presses").map(|n| n < 3).unwrap_or(false));
/// ```
pub struct FnInteraction {
    description:   String,
    duration_secs: f64,
    condition:     Option<Condition>,
    effect:        Effect,
    navigation:    Option<Pose>,
}

impl FnInteraction {
    pub fn new<F>(description: impl Into<String>, duration_secs: f64, effect: F) -> Self
    where
        F: Fn(&EffectScope<'_>) -> InteractResult<Vec<ValueChange>> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            duration_secs,
            condition: None,
            effect: Box::new(effect),
            navigation: None,
        }
    }

    /// Precondition checked before the effect runs.  `false` is reported as
    /// infeasible.
    pub fn when<C>(mut self, condition: C) -> Self
    where
        C: Fn(&EffectScope<'_>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Stand somewhere other than the interactable's own point.
    pub fn at(mut self, pose: Pose) -> Self {
        self.navigation = Some(pose);
        self
    }
}

impl Interaction for FnInteraction {
    fn description(&self) -> &str {
        &self.description
    }

    fn duration_estimate(&self, _scope: &EffectScope<'_>) -> f64 {
        self.duration_secs
    }

    fn effect(&self, scope: &EffectScope<'_>) -> InteractResult<Vec<ValueChange>> {
        if let Some(cond) = &self.condition {
            if !cond(scope) {
                return Err(InteractError::infeasible(format!(
                    "condition failed: {}",
                    self.description
                )));
            }
        }
        (self.effect)(scope)
    }

    fn navigation_point(&self) -> Option<Pose> {
        self.navigation
    }
}
