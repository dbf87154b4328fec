//! A small two-alliance field.
//!
//! ```text
//!  y=8 ┌──────────────────────────────────────────┐
//!      │ west_loader                   east_goal  │
//!      │                 ┌──────┐                 │
//!      │    ( park )     │ wall │                 │
//!      │                 └──────┘                 │
//!      │ west_goal                   east_loader  │
//!  y=0 └──────────────────────────────────────────┘
//!     x=0                                       x=16
//! ```

use std::f64::consts::PI;

use anyhow::Result;

use ms_core::{MatchTiming, Point, Pose};
use ms_interact::stations::{pickup_station, scoring_goal};
use ms_motion::Obstacle;
use ms_server::{Game, ParkingBonus};

const PIECE:        &str = "cone";
const LOADER_STOCK: i64  = 6;
const GOAL_POINTS:  i64  = 5;

pub fn build_game() -> Result<Game> {
    let game = Game::new("two robot field", 16.0, 8.0)
        .with_timing(MatchTiming { auto_secs: 15, teleop_secs: 105, endgame_secs: 20 })
        .with_obstacle(Obstacle::rect(7.0, 3.0, 9.0, 5.0))
        .with_rule(ParkingBonus { center: Point::new(4.0, 4.0), radius: 1.0, points: 3 })
        .with_interactable(pickup_station("west_loader", Pose::new(1.0, 6.5, PI), PIECE, LOADER_STOCK)?)?
        .with_interactable(pickup_station("east_loader", Pose::new(15.0, 1.5, 0.0), PIECE, LOADER_STOCK)?)?
        .with_interactable(scoring_goal("west_goal", Pose::new(1.0, 1.5, PI), PIECE, GOAL_POINTS)?)?
        .with_interactable(scoring_goal("east_goal", Pose::new(15.0, 6.5, 0.0), PIECE, GOAL_POINTS)?)?;
    Ok(game)
}
