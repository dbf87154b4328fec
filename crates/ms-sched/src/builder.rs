//! Fluent builder for constructing a [`Scheduler`].

use ms_motion::{CollisionRegistry, MotionPlanner};
use ms_server::GameServer;

use crate::scheduler::AgentSlot;
use crate::{BusyTable, RewardModel, SchedError, SchedResult, Scheduler, SchedulerConfig, ScoreDelta};

/// Fluent builder for [`Scheduler<R>`].
///
/// The roster, teams, footprints and action catalogs are read from the
/// server passed to [`build`][Self::build]; register every robot first.
///
/// ```rust,ignore
/// let mut sched = SchedulerBuilder::new(SchedulerConfig::default())
///     .reward(AllianceDifferential)
///     .build(&server)?;
/// let summary = sched.run_episode(&mut server, &mut RandomPolicy::new(), &mut NoopObserver)?;
/// ```
pub struct SchedulerBuilder<R: RewardModel> {
    config: SchedulerConfig,
    reward: R,
}

impl SchedulerBuilder<ScoreDelta> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config, reward: ScoreDelta }
    }
}

impl<R: RewardModel> SchedulerBuilder<R> {
    /// Replace the reward model (default [`ScoreDelta`]).
    pub fn reward<R2: RewardModel>(self, reward: R2) -> SchedulerBuilder<R2> {
        SchedulerBuilder { config: self.config, reward }
    }

    pub fn build<P: MotionPlanner>(self, server: &GameServer<P>) -> SchedResult<Scheduler<R>> {
        self.config.validate()?;

        let mut agents = Vec::new();
        for name in server.robot_names() {
            agents.push(AgentSlot {
                name:    name.to_owned(),
                team:    server.robot_state(name)?.team,
                radius:  server.descriptor(name)?.footprint_radius,
                catalog: server.action_catalog(name)?,
            });
        }
        if agents.is_empty() {
            return Err(SchedError::Config("no robots registered on the server".into()));
        }

        Ok(Scheduler {
            busy:    BusyTable::new(agents.len(), server.current_time()),
            traffic: CollisionRegistry::new(),
            steps:   0,
            config:  self.config,
            reward:  self.reward,
            agents,
        })
    }
}
