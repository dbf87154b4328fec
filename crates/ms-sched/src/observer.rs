//! Episode observer trait for progress reporting and data collection.

use ms_core::SimTime;
use ms_server::MatchLog;
use ms_state::StateSpace;

use crate::{EpisodeSummary, StepOutcome};

/// Callbacks invoked by [`Scheduler::run_episode`][crate::Scheduler::run_episode].
///
/// All methods have default no-op implementations.
///
/// # Example — score printer
///
/// ```rust,ignore
/// struct ScorePrinter;
///
/// impl MatchObserver for ScorePrinter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary, _log: &MatchLog) {
///         println!("{} – {}", summary.score.red, summary.score.blue);
///     }
/// }
/// ```
pub trait MatchObserver {
    /// Called after the reset, before the first step.
    fn on_episode_start(&mut self, _state: &StateSpace) {}

    /// Called before actions are chosen for `step` (1-based).
    fn on_step_start(&mut self, _step: u64, _now: SimTime) {}

    /// Called once the step has been applied and the clock advanced.
    fn on_step_end(&mut self, _outcome: &StepOutcome, _state: &StateSpace) {}

    /// Called once after the final step, with the server's match log.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary, _log: &MatchLog) {}
}

/// A [`MatchObserver`] that does nothing.
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}
