//! Unit tests for ms-motion.

use std::sync::Arc;

use ms_core::{Point, Pose, SimTime};

use crate::{
    CollisionRegistry, GridPlanner, LinearTrajectory, MotionPlanner, Obstacle, RobotDescriptor,
    SharedTrajectory, Trajectory, TrajectoryRequest, TraversalMap,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn robot() -> RobotDescriptor {
    RobotDescriptor { footprint_radius: 0.4, max_speed: 2.0, max_omega: 3.0 }
}

/// 10 × 6 m field with a wall in the middle, open above y = 4.
fn walled_map() -> TraversalMap {
    TraversalMap::new(10.0, 6.0, &[Obstacle::rect(4.8, 0.0, 5.2, 4.0)], 0.4, 0.1).unwrap()
}

fn straight(from: (f64, f64), to: (f64, f64)) -> SharedTrajectory {
    let a = Pose::new(from.0, from.1, 0.0);
    let b = Pose::new(to.0, to.1, 0.0);
    Arc::new(LinearTrajectory::through(a, &[], b, &robot()))
}

#[cfg(test)]
mod field {
    use super::*;

    #[test]
    fn margin_blocks_walls() {
        let map = TraversalMap::open(10.0, 6.0, 0.5, 0.1).unwrap();
        assert!(map.is_free(Point::new(5.0, 3.0)));
        assert!(!map.is_free(Point::new(0.2, 3.0)));
        assert!(!map.is_free(Point::new(5.0, 5.9)));
    }

    #[test]
    fn obstacles_are_inflated() {
        let map = walled_map();
        assert!(!map.is_free(Point::new(4.5, 2.0)));
        assert!(map.is_free(Point::new(4.3, 2.0)));
        assert_eq!(map.obstacle_count(), 1);
    }

    #[test]
    fn segment_through_wall_blocked() {
        let map = walled_map();
        assert!(!map.segment_clear(Point::new(2.0, 2.0), Point::new(8.0, 2.0)));
        assert!(map.segment_clear(Point::new(2.0, 5.0), Point::new(8.0, 5.0)));
    }

    #[test]
    fn circle_obstacle() {
        let map = TraversalMap::new(10.0, 10.0, &[Obstacle::circle(5.0, 5.0, 1.0)], 0.5, 0.25).unwrap();
        assert!(!map.is_free(Point::new(5.0, 6.4)));
        assert!(map.is_free(Point::new(5.0, 6.6)));
        assert!(!map.segment_clear(Point::new(1.0, 5.0), Point::new(9.0, 5.0)));
    }

    #[test]
    fn too_small_field_rejected() {
        assert!(TraversalMap::open(0.5, 6.0, 0.4, 0.1).is_err());
        assert!(TraversalMap::open(10.0, 6.0, 0.4, 0.0).is_err());
    }

    #[test]
    fn grid_cells_round_trip() {
        let map = walled_map();
        let idx = map.cell_of(Point::new(2.05, 3.05));
        let c = map.center(idx);
        assert!((c.x - 2.05).abs() < 1e-9 && (c.y - 3.05).abs() < 1e-9);
        assert!(!map.cell_free(map.cell_of(Point::new(5.0, 1.0))));
    }
}

#[cfg(test)]
mod trajectory {
    use super::*;

    #[test]
    fn straight_line_timing() {
        let t = straight((0.0, 0.0), (4.0, 0.0));
        assert!((t.travel_secs() - 2.0).abs() < 1e-9);
        assert_eq!(t.travel_ms(), 2_000);
        let mid = t.pose_at(1.0);
        assert!((mid.x - 2.0).abs() < 1e-9);
        assert_eq!(t.end_pose().point(), Point::new(4.0, 0.0));
    }

    #[test]
    fn turn_in_place_takes_time() {
        let r = robot();
        let t = LinearTrajectory::through(Pose::new(1.0, 1.0, 0.0), &[], Pose::new(1.0, 1.0, 1.5), &r);
        assert!((t.travel_secs() - 0.5).abs() < 1e-9);
        assert!((t.pose_at(0.25).heading - 0.75).abs() < 1e-9);
    }

    #[test]
    fn delay_holds_at_start() {
        let t = LinearTrajectory::through(Pose::new(0.0, 0.0, 0.0), &[], Pose::new(2.0, 0.0, 0.0), &robot())
            .with_delay(0.5);
        assert!((t.travel_secs() - 1.5).abs() < 1e-9);
        assert_eq!(t.pose_at(0.4).point(), Point::new(0.0, 0.0));
        assert!((t.pose_at(1.0).x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_waypoints_dropped() {
        let p = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 0.0)];
        let t = LinearTrajectory::through(Pose::new(0.0, 0.0, 0.0), &p, Pose::new(1.0, 0.0, 0.0), &robot());
        assert_eq!(t.waypoints().len(), 2);
        assert!((t.length() - 1.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn register_overwrites_and_clear_drops() {
        let mut reg = CollisionRegistry::new();
        assert!(reg.register_active_trajectory("a", straight((1.0, 1.0), (2.0, 1.0)), SimTime(0), 0.4).is_none());
        let prev = reg.register_active_trajectory("a", straight((2.0, 1.0), (3.0, 1.0)), SimTime(500), 0.4);
        assert_eq!(prev.unwrap().start_time, SimTime(0));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("a").unwrap().start_time, SimTime(500));

        reg.clear_all_active_trajectories();
        assert!(reg.get("a").is_none());
        assert!(reg.is_empty());
        assert_eq!(reg.iter().count(), 0);
    }

    #[test]
    fn completion_and_occupancy() {
        let mut reg = CollisionRegistry::new();
        reg.register_active_trajectory("a", straight((0.0, 0.0), (4.0, 0.0)), SimTime(1_000), 0.4);
        let a = reg.get("a").unwrap();
        assert_eq!(a.end_time(), SimTime(3_000));
        assert!(!a.is_complete(SimTime(2_999)));
        assert!(a.is_complete(SimTime(3_000)));
        let (c, r) = a.occupied_at(SimTime(2_000)).unwrap();
        assert!((c.x - 2.0).abs() < 1e-9);
        assert_eq!(r, 0.4);
        assert!(a.occupied_at(SimTime(3_000)).is_none());
    }

    #[test]
    fn others_excludes_self() {
        let mut reg = CollisionRegistry::new();
        reg.register_active_trajectory("a", straight((0.0, 0.0), (1.0, 0.0)), SimTime(0), 0.4);
        reg.register_active_trajectory("b", straight((0.0, 2.0), (1.0, 2.0)), SimTime(0), 0.4);
        let names: Vec<_> = reg.others("a").map(|(n, _)| n).collect();
        assert_eq!(names, ["b"]);
        assert!(reg.has_live_others("a", SimTime(100)));
        assert!(!reg.has_live_others("a", SimTime(10_000)));
    }
}

#[cfg(test)]
mod planner {
    use super::*;

    fn request<'a>(
        agent: &'a str,
        robot: &'a RobotDescriptor,
        start: Pose,
        goal: Pose,
        path: &'a [Point],
        map: &'a TraversalMap,
        obstacles: Option<&'a CollisionRegistry>,
    ) -> TrajectoryRequest<'a> {
        TrajectoryRequest { agent, robot, start, goal, path, map, obstacles, start_time: SimTime(0) }
    }

    #[test]
    fn straight_path_when_clear() {
        let map = walled_map();
        let path = GridPlanner::default()
            .find_path(&map, Point::new(1.0, 5.0), Point::new(9.0, 5.0))
            .unwrap();
        assert_eq!(path, vec![Point::new(1.0, 5.0), Point::new(9.0, 5.0)]);
    }

    #[test]
    fn routes_around_wall() {
        let map = walled_map();
        let start = Point::new(2.0, 1.0);
        let goal = Point::new(8.0, 1.0);
        let path = GridPlanner::default().find_path(&map, start, goal).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert!(path.len() >= 3);
        for w in path.windows(2) {
            assert!(map.segment_clear(w[0], w[1]), "{:?} -> {:?}", w[0], w[1]);
        }
        assert!(path.iter().any(|p| p.y > 4.0));
    }

    #[test]
    fn blocked_goal_has_no_path() {
        let map = walled_map();
        assert!(GridPlanner::default().find_path(&map, Point::new(2.0, 1.0), Point::new(5.0, 2.0)).is_none());
    }

    #[test]
    fn enclosed_goal_has_no_path() {
        let box_walls = [
            Obstacle::rect(6.0, 1.0, 9.0, 1.2),
            Obstacle::rect(6.0, 4.8, 9.0, 5.0),
            Obstacle::rect(6.0, 1.0, 6.2, 5.0),
            Obstacle::rect(8.8, 1.0, 9.0, 5.0),
        ];
        let map = TraversalMap::new(10.0, 6.0, &box_walls, 0.4, 0.1).unwrap();
        assert!(map.is_free(Point::new(7.5, 3.0)));
        assert!(GridPlanner::default().find_path(&map, Point::new(2.0, 3.0), Point::new(7.5, 3.0)).is_none());
    }

    #[test]
    fn no_registry_means_no_delay() {
        let map = TraversalMap::open(10.0, 6.0, 0.4, 0.1).unwrap();
        let r = robot();
        let (s, g) = (Pose::new(1.0, 3.0, 0.0), Pose::new(9.0, 3.0, 0.0));
        let path = [s.point(), g.point()];
        let t = GridPlanner::default()
            .generate_trajectory(&request("b", &r, s, g, &path, &map, None))
            .unwrap();
        assert!((t.travel_secs() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_traffic_delays_departure() {
        let map = TraversalMap::open(10.0, 6.0, 0.4, 0.1).unwrap();
        let r = robot();
        let mut reg = CollisionRegistry::new();
        // a drives up the middle of the field, through b's straight line.
        reg.register_active_trajectory("a", straight((5.0, 0.5), (5.0, 5.5)), SimTime(0), 0.4);

        let (s, g) = (Pose::new(3.0, 3.0, 0.0), Pose::new(7.0, 3.0, 0.0));
        let path = [s.point(), g.point()];
        let free = GridPlanner::default()
            .generate_trajectory(&request("b", &r, s, g, &path, &map, None))
            .unwrap();
        let avoided = GridPlanner::default()
            .generate_trajectory(&request("b", &r, s, g, &path, &map, Some(&reg)))
            .unwrap();
        assert!(avoided.travel_secs() > free.travel_secs());
    }

    #[test]
    fn own_entry_is_ignored() {
        let map = TraversalMap::open(10.0, 6.0, 0.4, 0.1).unwrap();
        let r = robot();
        let mut reg = CollisionRegistry::new();
        reg.register_active_trajectory("b", straight((3.0, 3.0), (7.0, 3.0)), SimTime(0), 0.4);
        let (s, g) = (Pose::new(3.0, 3.0, 0.0), Pose::new(7.0, 3.0, 0.0));
        let path = [s.point(), g.point()];
        let t = GridPlanner::default()
            .generate_trajectory(&request("b", &r, s, g, &path, &map, Some(&reg)))
            .unwrap();
        assert!((t.travel_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn gives_up_when_blocked_too_long() {
        let map = TraversalMap::open(10.0, 6.0, 0.4, 0.1).unwrap();
        let r = robot();
        let mut reg = CollisionRegistry::new();
        // a sits on b's goal for ten seconds.
        let parked = Arc::new(
            LinearTrajectory::through(Pose::new(7.0, 3.0, 0.0), &[], Pose::new(7.0, 3.0, 0.0), &r)
                .with_delay(10.0),
        );
        reg.register_active_trajectory("a", parked, SimTime(0), 0.4);
        let (s, g) = (Pose::new(3.0, 3.0, 0.0), Pose::new(7.0, 3.0, 0.0));
        let path = [s.point(), g.point()];
        assert!(GridPlanner::default()
            .generate_trajectory(&request("b", &r, s, g, &path, &map, Some(&reg)))
            .is_none());
    }
}
