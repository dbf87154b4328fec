//! Per-agent step rewards.

use ms_core::Alliance;
use ms_state::StateSpace;

/// The three global score cells, read at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBoard {
    pub total: i64,
    pub red:   i64,
    pub blue:  i64,
}

impl ScoreBoard {
    /// Missing cells read as zero.
    pub fn read(state: &StateSpace) -> Self {
        let int = |key: &str| state.value(key).and_then(|v| v.as_int()).unwrap_or(0);
        Self {
            total: int("score"),
            red:   int(Alliance::Red.score_key()),
            blue:  int(Alliance::Blue.score_key()),
        }
    }

    pub fn alliance(&self, team: Alliance) -> i64 {
        match team {
            Alliance::Red  => self.red,
            Alliance::Blue => self.blue,
        }
    }
}

/// Everything a reward model sees for one agent and one step.
#[derive(Clone, Copy, Debug)]
pub struct RewardInput<'a> {
    pub agent:                  &'a str,
    pub team:                   Alliance,
    pub action_valid:           bool,
    pub before:                 &'a ScoreBoard,
    pub after:                  &'a ScoreBoard,
    pub invalid_action_penalty: f64,
}

impl RewardInput<'_> {
    fn penalty(&self) -> f64 {
        if self.action_valid { 0.0 } else { self.invalid_action_penalty }
    }
}

pub trait RewardModel: Send + Sync {
    fn reward(&self, input: &RewardInput<'_>) -> f64;
}

/// Change in the global score, plus the penalty for an invalid action.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreDelta;

impl RewardModel for ScoreDelta {
    fn reward(&self, input: &RewardInput<'_>) -> f64 {
        (input.after.total - input.before.total) as f64 + input.penalty()
    }
}

/// Change in (own alliance − opponent) score, plus the penalty for an
/// invalid action.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllianceDifferential;

impl RewardModel for AllianceDifferential {
    fn reward(&self, input: &RewardInput<'_>) -> f64 {
        let margin = |s: &ScoreBoard| s.alliance(input.team) - s.alliance(input.team.opponent());
        (margin(input.after) - margin(input.before)) as f64 + input.penalty()
    }
}
