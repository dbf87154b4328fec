//! Planar field geometry.
//!
//! Field coordinates are metres with the origin at one corner; headings are
//! radians, normalised to `(-π, π]`.

use std::f64::consts::PI;

/// A point on the field.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// A robot pose: position plus heading.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x:       f64,
    pub y:       f64,
    pub heading: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading: normalize_angle(heading) }
    }

    #[inline]
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(self, other: Pose) -> f64 {
        self.point().distance(other.point())
    }

    /// Absolute heading change needed to turn from `self` to `other`.
    #[inline]
    pub fn turn_to(self, other: Pose) -> f64 {
        normalize_angle(other.heading - self.heading).abs()
    }
}

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(theta: f64) -> f64 {
    if !theta.is_finite() {
        return 0.0;
    }
    let mut a = theta % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}
