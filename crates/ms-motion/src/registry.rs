//! Who is moving where, and since when.

use std::collections::BTreeMap;

use ms_core::{Point, SimTime};

use crate::SharedTrajectory;

/// One robot's in-flight motion plan.
#[derive(Clone, Debug)]
pub struct ActiveTrajectory {
    pub trajectory: SharedTrajectory,
    pub start_time: SimTime,
    /// Radius of the region the robot occupies, metres.
    pub radius:     f64,
}

impl ActiveTrajectory {
    pub fn end_time(&self) -> SimTime {
        self.start_time.offset(self.trajectory.travel_ms())
    }

    /// `true` once the robot has arrived.
    pub fn is_complete(&self, now: SimTime) -> bool {
        self.end_time() <= now
    }

    /// Centre and radius of the occupied disc at `t`; `None` once the
    /// trajectory has completed.
    pub fn occupied_at(&self, t: SimTime) -> Option<(Point, f64)> {
        if self.is_complete(t) {
            return None;
        }
        let elapsed = t.since(self.start_time) as f64 / 1_000.0;
        Some((self.trajectory.pose_at(elapsed).point(), self.radius))
    }
}

/// Trajectories of every robot that has moved this episode, keyed by robot
/// name.
///
/// Entries are overwritten on the owner's next dispatch and dropped only by
/// [`clear_all_active_trajectories`][Self::clear_all_active_trajectories];
/// use [`ActiveTrajectory::is_complete`] for exact occupancy.
#[derive(Clone, Debug, Default)]
pub struct CollisionRegistry {
    entries: BTreeMap<String, ActiveTrajectory>,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `agent`'s trajectory, replacing any previous one.
    pub fn register_active_trajectory(
        &mut self,
        agent:      &str,
        trajectory: SharedTrajectory,
        start_time: SimTime,
        radius:     f64,
    ) -> Option<ActiveTrajectory> {
        self.entries.insert(
            agent.to_owned(),
            ActiveTrajectory { trajectory, start_time, radius },
        )
    }

    /// Forget everything.  Called at episode reset.
    pub fn clear_all_active_trajectories(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, agent: &str) -> Option<&ActiveTrajectory> {
        self.entries.get(agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActiveTrajectory)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Everyone except `agent`.
    pub fn others<'a>(&'a self, agent: &'a str) -> impl Iterator<Item = (&'a str, &'a ActiveTrajectory)> + 'a {
        self.iter().filter(move |(name, _)| *name != agent)
    }

    /// `true` if any robot other than `agent` is still moving at `now`.
    pub fn has_live_others(&self, agent: &str, now: SimTime) -> bool {
        self.others(agent).any(|(_, a)| !a.is_complete(now))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
