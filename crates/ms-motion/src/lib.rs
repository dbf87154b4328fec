//! `ms-motion` — getting robots from A to B without hitting anything.
//!
//! # Pluggability
//!
//! The server calls planning through the [`MotionPlanner`] trait, so a
//! spline generator or an external physics-based planner can replace the
//! default [`GridPlanner`] without touching the engine.
//!
//! # Dynamic obstacles
//!
//! Robots already in motion are published in a [`CollisionRegistry`].  The
//! scheduler registers each dispatched trajectory before dispatching the next
//! robot, and planners receive the registry in every [`TrajectoryRequest`].
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`robot`]      | `RobotDescriptor` (footprint and speed limits)        |
//! | [`field`]      | `Obstacle`, `TraversalMap` (R-tree + occupancy grid)  |
//! | [`trajectory`] | `Trajectory` trait, `LinearTrajectory`                |
//! | [`planner`]    | `MotionPlanner` trait, `TrajectoryRequest`, `GridPlanner` |
//! | [`registry`]   | `CollisionRegistry`, `ActiveTrajectory`               |

pub mod error;
pub mod field;
pub mod planner;
pub mod registry;
pub mod robot;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use error::{MotionError, MotionResult};
pub use field::{Obstacle, TraversalMap};
pub use planner::{GridPlanner, MotionPlanner, TrajectoryRequest};
pub use registry::{ActiveTrajectory, CollisionRegistry};
pub use robot::RobotDescriptor;
pub use trajectory::{LinearTrajectory, SharedTrajectory, Trajectory};
