//! Motion plans.

use std::fmt;
use std::sync::Arc;

use ms_core::{normalize_angle, Point, Pose, SimTime};

use crate::RobotDescriptor;

/// A time-parameterised motion plan.
///
/// Opaque to the engine apart from its duration and the pose query used for
/// collision checks.
pub trait Trajectory: Send + Sync + fmt::Debug {
    /// Total time from departure to arrival, seconds.
    fn travel_secs(&self) -> f64;

    /// Pose `elapsed_secs` after the trajectory starts.  Clamped: negative
    /// times give the start pose, times past the end give the end pose.
    fn pose_at(&self, elapsed_secs: f64) -> Pose;

    /// Travel time in whole milliseconds, rounded up.
    fn travel_ms(&self) -> u64 {
        SimTime::ms_from_secs(self.travel_secs())
    }

    fn start_pose(&self) -> Pose {
        self.pose_at(0.0)
    }

    fn end_pose(&self) -> Pose {
        self.pose_at(self.travel_secs())
    }
}

/// Trajectories are shared between the server (cache, receipts) and the
/// collision registry.
pub type SharedTrajectory = Arc<dyn Trajectory>;

// ── LinearTrajectory ──────────────────────────────────────────────────────────

/// Piecewise-linear path driven at constant speed, turning while driving,
/// optionally preceded by a hold at the start.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearTrajectory {
    waypoints:     Vec<Point>,
    /// Arc length from the first waypoint to each waypoint.
    cumulative:    Vec<f64>,
    start_heading: f64,
    end_heading:   f64,
    delay_secs:    f64,
    motion_secs:   f64,
}

impl LinearTrajectory {
    /// Drive from `start` through `path` to `goal`.
    ///
    /// Consecutive duplicate points are dropped, and `start`/`goal` are added
    /// if `path` does not already begin and end there.
    pub fn through(start: Pose, path: &[Point], goal: Pose, robot: &RobotDescriptor) -> Self {
        let mut waypoints: Vec<Point> = Vec::with_capacity(path.len() + 2);
        for p in std::iter::once(start.point())
            .chain(path.iter().copied())
            .chain(std::iter::once(goal.point()))
        {
            if waypoints.last().is_none_or(|last| last.distance(p) > 1e-9) {
                waypoints.push(p);
            }
        }

        let mut cumulative = Vec::with_capacity(waypoints.len());
        let mut acc = 0.0;
        cumulative.push(0.0);
        for w in waypoints.windows(2) {
            acc += w[0].distance(w[1]);
            cumulative.push(acc);
        }

        let drive = acc / robot.max_speed;
        let turn = start.turn_to(goal) / robot.max_omega;

        Self {
            waypoints,
            cumulative,
            start_heading: start.heading,
            end_heading:   goal.heading,
            delay_secs:    0.0,
            motion_secs:   drive.max(turn),
        }
    }

    /// Hold at the start for `secs` before moving.
    pub fn with_delay(mut self, secs: f64) -> Self {
        self.delay_secs = secs.max(0.0);
        self
    }

    pub fn delay_secs(&self) -> f64 {
        self.delay_secs
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Path length, metres.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn point_at_distance(&self, d: f64) -> Point {
        let seg = self.cumulative.partition_point(|&c| c <= d);
        if seg == 0 {
            return self.waypoints[0];
        }
        if seg >= self.waypoints.len() {
            return self.waypoints[self.waypoints.len() - 1];
        }
        let (a, b) = (self.waypoints[seg - 1], self.waypoints[seg]);
        let span = self.cumulative[seg] - self.cumulative[seg - 1];
        a.lerp(b, (d - self.cumulative[seg - 1]) / span)
    }
}

impl Trajectory for LinearTrajectory {
    fn travel_secs(&self) -> f64 {
        self.delay_secs + self.motion_secs
    }

    fn pose_at(&self, elapsed_secs: f64) -> Pose {
        let u = if self.motion_secs > 0.0 {
            ((elapsed_secs - self.delay_secs) / self.motion_secs).clamp(0.0, 1.0)
        } else if elapsed_secs >= self.delay_secs {
            1.0
        } else {
            0.0
        };
        let p = self.point_at_distance(u * self.length());
        let turn = normalize_angle(self.end_heading - self.start_heading);
        Pose::new(p.x, p.y, self.start_heading + turn * u)
    }
}
