//! Time-driven match rules.
//!
//! A rule looks at the state whenever the match clock moves from `previous`
//! to `now` and may return a journal.  Rules fire on window crossings, so a
//! rule tied to an instant fires exactly once however the clock is stepped.

use ms_core::{Alliance, MatchTiming, Point, SimTime};
use ms_state::{CellPath, RobotState, StateSpace, ValueChange, ROBOTS};

/// A rule evaluated on every clock advance.
pub trait MatchRule: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Journal for the advance from `previous` (exclusive) to `now`
    /// (inclusive).  Most calls return nothing.
    fn evaluate(
        &self,
        state:    &StateSpace,
        previous: SimTime,
        now:      SimTime,
        timing:   &MatchTiming,
    ) -> Vec<ValueChange>;
}

/// At the final buzzer, each robot inside the zone earns its alliance
/// `points`.
#[derive(Clone, Debug)]
pub struct ParkingBonus {
    pub center: Point,
    pub radius: f64,
    pub points: i64,
}

impl MatchRule for ParkingBonus {
    fn name(&self) -> &str {
        "parking bonus"
    }

    fn evaluate(
        &self,
        state:    &StateSpace,
        previous: SimTime,
        now:      SimTime,
        timing:   &MatchTiming,
    ) -> Vec<ValueChange> {
        let end = timing.end();
        if !(previous < end && now >= end) {
            return Vec::new();
        }
        let Ok(names) = state.entities(ROBOTS) else {
            return Vec::new();
        };
        let mut per_alliance = [(Alliance::Red, 0i64), (Alliance::Blue, 0i64)];
        for name in names {
            let Ok(robot) = state.get(ROBOTS, name).and_then(|b| RobotState::from_space(name, b)) else {
                continue;
            };
            if robot.pose.point().distance(self.center) <= self.radius {
                for (team, pts) in per_alliance.iter_mut() {
                    if *team == robot.team {
                        *pts += self.points;
                    }
                }
            }
        }
        per_alliance
            .into_iter()
            .filter(|&(_, pts)| pts > 0)
            .flat_map(|(team, pts)| {
                [
                    ValueChange::increase(CellPath::global("score"), pts),
                    ValueChange::increase(CellPath::global(team.score_key()), pts),
                ]
            })
            .collect()
    }
}
