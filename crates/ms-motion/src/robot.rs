use std::f64::consts::TAU;

use crate::{MotionError, MotionResult};

/// Physical limits of one robot, as seen by the planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotDescriptor {
    /// Radius of the bounding circle, metres.
    pub footprint_radius: f64,
    /// Top linear speed, m/s.
    pub max_speed:        f64,
    /// Top turn rate, rad/s.
    pub max_omega:        f64,
}

impl Default for RobotDescriptor {
    fn default() -> Self {
        Self {
            footprint_radius: 0.45,
            max_speed:        4.0,
            max_omega:        TAU,
        }
    }
}

impl RobotDescriptor {
    pub fn new(footprint_radius: f64, max_speed: f64) -> Self {
        Self { footprint_radius, max_speed, ..Self::default() }
    }

    pub fn validate(&self) -> MotionResult<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.footprint_radius) {
            return Err(MotionError::InvalidRobot(format!(
                "footprint radius {} must be positive",
                self.footprint_radius
            )));
        }
        if !ok(self.max_speed) || !ok(self.max_omega) {
            return Err(MotionError::InvalidRobot("speed limits must be positive".into()));
        }
        Ok(())
    }
}
