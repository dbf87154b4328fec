//! Ready-made interactables for common game pieces flows.
//!
//! | Builder            | Interaction | Effect                                         |
//! |--------------------|-------------|------------------------------------------------|
//! | [`pickup_station`] | `PICKUP`    | stock −1, robot's held count +1                |
//! | [`scoring_goal`]   | `SCORE`     | held −1, `score` and alliance score +points    |
//!
//! A robot carries at most one piece of each kind.

use ms_core::Pose;
use ms_state::{CellPath, StateSpace, ValueChange};

use crate::{FnInteraction, InteractError, InteractResult, Interactable};

pub const PICKUP: &str = "PICKUP";
pub const SCORE: &str = "SCORE";

/// Cell on a pickup station holding the remaining stock.
pub const STOCK: &str = "stock";
/// Cell on a goal counting pieces scored into it.
pub const SCORED: &str = "scored";

const PICKUP_SECS: f64 = 1.0;
const SCORE_SECS: f64 = 0.5;

/// A station handing out up to `stock` pieces of `kind`.
pub fn pickup_station(
    name:  &str,
    at:    Pose,
    kind:  &str,
    stock: i64,
) -> InteractResult<Interactable> {
    let kind = kind.to_owned();
    let pickup = FnInteraction::new(format!("pick up one {kind}"), PICKUP_SECS, move |s| {
        let held = s
            .actor
            .held(&kind)
            .ok_or_else(|| InteractError::infeasible(format!("{} cannot carry {kind}", s.actor.name)))?;
        if held >= 1 {
            return Err(InteractError::infeasible(format!("{} already holds {kind}", s.actor.name)));
        }
        if s.target.int(STOCK)? <= 0 {
            return Err(InteractError::infeasible(format!("{} is empty", s.target.name)));
        }
        Ok(vec![
            ValueChange::decrease(s.target.cell(STOCK), 1i64),
            ValueChange::increase(s.actor.gamepiece_cell(&kind), 1i64),
        ])
    });

    Interactable::new(name, at)
        .with_state(StateSpace::new().with_value(STOCK, stock))
        .with_interaction(PICKUP, pickup)
}

/// A goal worth `points` per `kind` piece, credited to the scorer's alliance.
pub fn scoring_goal(name: &str, at: Pose, kind: &str, points: i64) -> InteractResult<Interactable> {
    let kind = kind.to_owned();
    let score = FnInteraction::new(format!("score one {kind}"), SCORE_SECS, move |s| {
        if s.actor.held(&kind).unwrap_or(0) < 1 {
            return Err(InteractError::infeasible(format!("{} holds no {kind}", s.actor.name)));
        }
        let alliance = s.actor.alliance()?;
        Ok(vec![
            ValueChange::decrease(s.actor.gamepiece_cell(&kind), 1i64),
            ValueChange::increase(s.target.cell(SCORED), 1i64),
            ValueChange::increase(CellPath::global("score"), points),
            ValueChange::increase(CellPath::global(alliance.score_key()), points),
        ])
    });

    Interactable::new(name, at)
        .with_state(StateSpace::new().with_value(SCORED, 0i64))
        .with_interaction(SCORE, score)
}
