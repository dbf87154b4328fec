//! Static field geometry as seen by one robot.
//!
//! # Configuration space
//!
//! A [`TraversalMap`] is built per robot: every obstacle is inflated by the
//! robot's footprint radius (plus clearance), and the field walls are pulled
//! in by the same margin.  The robot can then be treated as a point.
//!
//! Obstacles are indexed in an R-tree (via `rstar`) keyed by their inflated
//! bounding boxes.  A coarse occupancy grid is precomputed at construction so
//! grid planners never query the tree in their inner loop.

use rstar::{RTree, RTreeObject, AABB};

use ms_core::Point;

use crate::{MotionError, MotionResult};

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A static obstacle on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Obstacle {
    Circle { center: Point, radius: f64 },
    /// Axis-aligned rectangle.
    Rect { min: Point, max: Point },
}

impl Obstacle {
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Obstacle::Circle { center: Point::new(x, y), radius }
    }

    /// Rectangle from any two opposite corners.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Obstacle::Rect {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Grow by `by` metres on every side.  Rectangles keep square corners,
    /// which over-approximates the true Minkowski sum.
    pub fn inflate(self, by: f64) -> Self {
        match self {
            Obstacle::Circle { center, radius } => Obstacle::Circle { center, radius: radius + by },
            Obstacle::Rect { min, max } => Obstacle::Rect {
                min: Point::new(min.x - by, min.y - by),
                max: Point::new(max.x + by, max.y + by),
            },
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match *self {
            Obstacle::Circle { center, radius } => center.distance(p) < radius,
            Obstacle::Rect { min, max } => p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y,
        }
    }

    /// `true` if the segment `a`–`b` enters the obstacle.
    pub fn hits_segment(&self, a: Point, b: Point) -> bool {
        match *self {
            Obstacle::Circle { center, radius } => point_segment_distance(center, a, b) < radius,
            Obstacle::Rect { min, max } => segment_hits_rect(a, b, min, max),
        }
    }

    fn bounds(&self) -> AABB<[f64; 2]> {
        match *self {
            Obstacle::Circle { center, radius } => AABB::from_corners(
                [center.x - radius, center.y - radius],
                [center.x + radius, center.y + radius],
            ),
            Obstacle::Rect { min, max } => AABB::from_corners([min.x, min.y], [max.x, max.y]),
        }
    }
}

/// R-tree entry wrapping an inflated obstacle.
struct Indexed(Obstacle);

impl RTreeObject for Indexed {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.0.bounds()
    }
}

// ── TraversalMap ──────────────────────────────────────────────────────────────

/// Free space for one robot footprint.
pub struct TraversalMap {
    pub width:      f64,
    pub height:     f64,
    /// Distance kept from walls and obstacles, metres.
    pub margin:     f64,
    /// Occupancy grid cell size, metres.
    pub resolution: f64,
    tree:           RTree<Indexed>,
    cols:           usize,
    rows:           usize,
    free:           Vec<bool>,
}

impl TraversalMap {
    /// Inflate `obstacles` by `margin` and precompute the occupancy grid.
    pub fn new(
        width:      f64,
        height:     f64,
        obstacles:  &[Obstacle],
        margin:     f64,
        resolution: f64,
    ) -> MotionResult<Self> {
        if !(width > 2.0 * margin && height > 2.0 * margin) {
            return Err(MotionError::InvalidField(format!(
                "{width}×{height} m field leaves no room for a {margin} m margin"
            )));
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(MotionError::InvalidField(format!("grid resolution {resolution}")));
        }

        let tree = RTree::bulk_load(
            obstacles.iter().map(|o| Indexed(o.inflate(margin))).collect(),
        );
        let cols = (width / resolution).ceil() as usize;
        let rows = (height / resolution).ceil() as usize;

        let mut map = Self {
            width,
            height,
            margin,
            resolution,
            tree,
            cols,
            rows,
            free: Vec::new(),
        };
        let free: Vec<bool> = (0..cols * rows).map(|i| map.is_free(map.center(i))).collect();
        map.free = free;
        Ok(map)
    }

    /// An obstacle-free field.
    pub fn open(width: f64, height: f64, margin: f64, resolution: f64) -> MotionResult<Self> {
        Self::new(width, height, &[], margin, resolution)
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= self.margin
            && p.x <= self.width - self.margin
            && p.y >= self.margin
            && p.y <= self.height - self.margin
    }

    /// `true` if a robot centred at `p` touches nothing.
    pub fn is_free(&self, p: Point) -> bool {
        if !self.in_bounds(p) {
            return false;
        }
        let probe = AABB::from_point([p.x, p.y]);
        !self
            .tree
            .locate_in_envelope_intersecting(&probe)
            .any(|o| o.0.contains(p))
    }

    /// `true` if the robot can drive straight from `a` to `b`.
    pub fn segment_clear(&self, a: Point, b: Point) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        let probe = AABB::from_corners([a.x, a.y], [b.x, b.y]);
        !self
            .tree
            .locate_in_envelope_intersecting(&probe)
            .any(|o| o.0.hits_segment(a, b))
    }

    pub fn obstacle_count(&self) -> usize {
        self.tree.size()
    }

    // ── Occupancy grid ────────────────────────────────────────────────────

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid cell containing `p`, clamped to the field.
    pub fn cell_of(&self, p: Point) -> usize {
        let c = ((p.x / self.resolution).floor().max(0.0) as usize).min(self.cols - 1);
        let r = ((p.y / self.resolution).floor().max(0.0) as usize).min(self.rows - 1);
        r * self.cols + c
    }

    /// Centre of grid cell `idx`.
    pub fn center(&self, idx: usize) -> Point {
        let (r, c) = (idx / self.cols, idx % self.cols);
        Point::new(
            ((c as f64 + 0.5) * self.resolution).min(self.width),
            ((r as f64 + 0.5) * self.resolution).min(self.height),
        )
    }

    #[inline]
    pub fn cell_free(&self, idx: usize) -> bool {
        self.free.get(idx).copied().unwrap_or(false)
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

pub(crate) fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(a.lerp(b, t))
}

/// Liang–Barsky clip of segment `a`–`b` against the open box.
fn segment_hits_rect(a: Point, b: Point, min: Point, max: Point) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, a.x - min.x), (dx, max.x - a.x), (-dy, a.y - min.y), (dy, max.y - a.y)] {
        if p == 0.0 {
            if q <= 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 >= t1 {
            return false;
        }
    }
    true
}
