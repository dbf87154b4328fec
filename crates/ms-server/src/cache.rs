//! Trajectory cache keyed by quantised start and goal poses.

use rustc_hash::FxHashMap;

use ms_core::Pose;
use ms_motion::SharedTrajectory;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    robot: String,
    start: [i64; 3],
    goal:  [i64; 3],
}

/// Hit/miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits:    u64,
    pub misses:  u64,
    pub entries: usize,
}

/// Reuses trajectories for repeated (robot, start, goal) queries.
///
/// Only trajectories planned without dynamic obstacles are stored; callers
/// must not consult the cache while other robots are moving.
#[derive(Debug)]
pub struct TrajectoryCache {
    /// Quantisation step for x, y (metres) and heading (radians).
    precision: f64,
    entries:   FxHashMap<CacheKey, SharedTrajectory>,
    hits:      u64,
    misses:    u64,
}

impl TrajectoryCache {
    pub fn new(precision: f64) -> Self {
        Self {
            precision: if precision > 0.0 { precision } else { 0.1 },
            entries:   FxHashMap::default(),
            hits:      0,
            misses:    0,
        }
    }

    fn quantize(&self, p: Pose) -> [i64; 3] {
        let q = |v: f64| (v / self.precision).round() as i64;
        [q(p.x), q(p.y), q(p.heading)]
    }

    fn key(&self, robot: &str, start: Pose, goal: Pose) -> CacheKey {
        CacheKey {
            robot: robot.to_owned(),
            start: self.quantize(start),
            goal:  self.quantize(goal),
        }
    }

    pub fn get(&mut self, robot: &str, start: Pose, goal: Pose) -> Option<SharedTrajectory> {
        let key = self.key(robot, start, goal);
        match self.entries.get(&key) {
            Some(t) => {
                self.hits += 1;
                Some(t.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, robot: &str, start: Pose, goal: Pose, trajectory: SharedTrajectory) {
        let key = self.key(robot, start, goal);
        self.entries.insert(key, trajectory);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits:    self.hits,
            misses:  self.misses,
            entries: self.entries.len(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
