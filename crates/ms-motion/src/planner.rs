//! Planning trait and the default grid planner.
//!
//! # Default strategy
//!
//! [`GridPlanner`] drives straight when the segment is clear, otherwise runs
//! 8-connected Dijkstra on the map's occupancy grid and pulls the result
//! taut.  Against other robots it only varies the **departure time**: it
//! holds at the start in fixed steps until the path no longer intersects any
//! registered in-flight trajectory, and gives up past `max_delay_secs`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use ms_core::{Point, Pose, SimTime};
use tracing::debug;

use crate::{CollisionRegistry, LinearTrajectory, RobotDescriptor, SharedTrajectory, Trajectory, TraversalMap};

// ── MotionPlanner trait ───────────────────────────────────────────────────────

/// Everything a planner may use to build one trajectory.
#[derive(Clone, Copy)]
pub struct TrajectoryRequest<'a> {
    pub agent:      &'a str,
    pub robot:      &'a RobotDescriptor,
    pub start:      Pose,
    pub goal:       Pose,
    /// Output of [`MotionPlanner::find_path`].
    pub path:       &'a [Point],
    pub map:        &'a TraversalMap,
    /// Other robots' in-flight trajectories; `None` when dynamic avoidance
    /// is switched off.
    pub obstacles:  Option<&'a CollisionRegistry>,
    /// Match time at which the robot departs.
    pub start_time: SimTime,
}

/// Pluggable path finder and trajectory generator.
///
/// Implementations must be `Send + Sync` so pooled servers can run on worker
/// threads.
pub trait MotionPlanner: Send + Sync {
    /// Collision-free polyline from `start` to `goal` on the static map, or
    /// `None` if the goal is unreachable.
    fn find_path(&self, map: &TraversalMap, start: Point, goal: Point) -> Option<Vec<Point>>;

    /// Time-parameterise `request.path`.  `None` means no feasible
    /// trajectory exists.
    fn generate_trajectory(&self, request: &TrajectoryRequest<'_>) -> Option<SharedTrajectory>;
}

// ── GridPlanner ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GridPlanner {
    /// Longest hold at the start before giving up, seconds.
    pub max_delay_secs:  f64,
    /// Departure-time search step, seconds.
    pub delay_step_secs: f64,
    /// Sampling interval for conflict checks, seconds.
    pub check_step_secs: f64,
}

impl Default for GridPlanner {
    fn default() -> Self {
        Self {
            max_delay_secs:  3.0,
            delay_step_secs: 0.1,
            check_step_secs: 0.05,
        }
    }
}

impl MotionPlanner for GridPlanner {
    fn find_path(&self, map: &TraversalMap, start: Point, goal: Point) -> Option<Vec<Point>> {
        if !map.is_free(goal) {
            return None;
        }
        if map.segment_clear(start, goal) {
            return Some(vec![start, goal]);
        }
        let raw = grid_search(map, start, goal)?;
        Some(shortcut(map, raw))
    }

    fn generate_trajectory(&self, req: &TrajectoryRequest<'_>) -> Option<SharedTrajectory> {
        let base = LinearTrajectory::through(req.start, req.path, req.goal, req.robot);
        let Some(registry) = req.obstacles else {
            return Some(Arc::new(base));
        };

        let steps = if self.delay_step_secs > 0.0 {
            (self.max_delay_secs / self.delay_step_secs).floor() as usize
        } else {
            0
        };
        for k in 0..=steps {
            let delay = k as f64 * self.delay_step_secs;
            let candidate = base.clone().with_delay(delay);
            if !self.conflicts(&candidate, req, registry) {
                if k > 0 {
                    debug!(agent = req.agent, delay_secs = delay, "departure delayed to avoid traffic");
                }
                return Some(Arc::new(candidate));
            }
        }
        debug!(agent = req.agent, "no conflict-free departure within {} s", self.max_delay_secs);
        None
    }
}

impl GridPlanner {
    /// `true` if the moving part of `traj` comes within touching distance of
    /// any other robot's in-flight trajectory.
    fn conflicts(
        &self,
        traj:     &LinearTrajectory,
        req:      &TrajectoryRequest<'_>,
        registry: &CollisionRegistry,
    ) -> bool {
        if !registry.has_live_others(req.agent, req.start_time) {
            return false;
        }
        let step = self.check_step_secs.max(1e-3);
        let total = traj.travel_secs();
        let mut t = traj.delay_secs();
        loop {
            let at = req.start_time.offset(SimTime::ms_from_secs(t));
            let me = traj.pose_at(t).point();
            let hit = registry.others(req.agent).any(|(_, other)| {
                other
                    .occupied_at(at)
                    .is_some_and(|(c, r)| me.distance(c) < r + req.robot.footprint_radius)
            });
            if hit {
                return true;
            }
            if t >= total {
                return false;
            }
            t = (t + step).min(total);
        }
    }
}

// ── Grid search ───────────────────────────────────────────────────────────────

/// Dijkstra over free grid cells, costs in millimetres.
fn grid_search(map: &TraversalMap, start: Point, goal: Point) -> Option<Vec<Point>> {
    let (cols, rows) = (map.cols() as isize, map.rows() as isize);
    let src = map.cell_of(start);
    let dst = goal_cell(map, goal)?;

    let straight = (map.resolution * 1_000.0).round() as u64;
    let diagonal = (map.resolution * 1_414.0).round() as u64;

    let n = map.cols() * map.rows();
    let mut dist = vec![u64::MAX; n];
    let mut prev = vec![usize::MAX; n];
    let mut heap = BinaryHeap::new();
    dist[src] = 0;
    heap.push(Reverse((0u64, src)));

    while let Some(Reverse((d, cell))) = heap.pop() {
        if cell == dst {
            break;
        }
        if d > dist[cell] {
            continue;
        }
        let (r, c) = ((cell / map.cols()) as isize, (cell % map.cols()) as isize);
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)] {
            let (nr, nc) = (r + dr, c + dc);
            if nr < 0 || nc < 0 || nr >= rows || nc >= cols {
                continue;
            }
            let next = (nr * cols + nc) as usize;
            if !map.cell_free(next) {
                continue;
            }
            let diag = dr != 0 && dc != 0;
            if diag
                && !(map.cell_free((r * cols + nc) as usize) && map.cell_free((nr * cols + c) as usize))
            {
                continue;
            }
            let nd = d + if diag { diagonal } else { straight };
            if nd < dist[next] {
                dist[next] = nd;
                prev[next] = cell;
                heap.push(Reverse((nd, next)));
            }
        }
    }

    if dist[dst] == u64::MAX {
        return None;
    }
    let mut cells = vec![dst];
    let mut at = dst;
    while prev[at] != usize::MAX {
        at = prev[at];
        cells.push(at);
    }
    cells.reverse();

    let mut path = Vec::with_capacity(cells.len() + 2);
    path.push(start);
    path.extend(cells.into_iter().skip(1).map(|c| map.center(c)));
    path.push(goal);
    Some(path)
}

/// A free cell next to `goal` with a clear line to it.
fn goal_cell(map: &TraversalMap, goal: Point) -> Option<usize> {
    let home = map.cell_of(goal);
    let (cols, rows) = (map.cols() as isize, map.rows() as isize);
    let (r, c) = ((home / map.cols()) as isize, (home % map.cols()) as isize);
    for (dr, dc) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)] {
        let (nr, nc) = (r + dr, c + dc);
        if nr < 0 || nc < 0 || nr >= rows || nc >= cols {
            continue;
        }
        let idx = (nr * cols + nc) as usize;
        if map.cell_free(idx) && map.segment_clear(map.center(idx), goal) {
            return Some(idx);
        }
    }
    None
}

/// Greedy string pulling: from each kept point jump to the farthest point
/// still in line of sight.
fn shortcut(map: &TraversalMap, pts: Vec<Point>) -> Vec<Point> {
    if pts.len() <= 2 {
        return pts;
    }
    let last = pts.len() - 1;
    let mut out = vec![pts[0]];
    let mut i = 0;
    while i < last {
        let mut j = last;
        while j > i + 1 && !map.segment_clear(pts[i], pts[j]) {
            j -= 1;
        }
        out.push(pts[j]);
        i = j;
    }
    out
}
