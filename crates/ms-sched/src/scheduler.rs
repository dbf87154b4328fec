//! The `Scheduler` and its step loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use ms_core::{Alliance, SimTime};
use ms_interact::{ActionCatalog, ActionKey, WAIT};
use ms_motion::{CollisionRegistry, MotionPlanner, SharedTrajectory, Trajectory};
use ms_server::GameServer;

use crate::{
    BusyTable, MatchObserver, Policy, RewardInput, RewardModel, SchedResult, SchedulerConfig,
    ScoreBoard,
};

/// Label reported for an agent that was still mid-action.
pub const BUSY: &str = "BUSY";
/// Label reported for a catalog index out of range.
pub const INVALID: &str = "INVALID";

// ── Step results ──────────────────────────────────────────────────────────────

/// What happened to one agent during one step.
#[derive(Clone, Debug)]
pub struct AgentStepInfo {
    pub agent:         String,
    pub action_valid:  bool,
    /// `WAIT`, `BUSY`, `INVALID`, or `interactable:interaction`.
    pub action_label:  String,
    /// Free at the end of the step.
    pub is_free:       bool,
    pub trajectory:    Option<SharedTrajectory>,
    /// Travel time of `trajectory`, ms.
    pub trajectory_ms: u64,
    /// Busy time committed this step, ms.  Zero for busy agents.
    pub action_ms:     u64,
    pub reward:        f64,
}

impl AgentStepInfo {
    fn new(agent: &str, label: impl Into<String>, valid: bool) -> Self {
        Self {
            agent:         agent.to_owned(),
            action_valid:  valid,
            action_label:  label.into(),
            is_free:       false,
            trajectory:    None,
            trajectory_ms: 0,
            action_ms:     0,
            reward:        0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// 1-based step number within the episode.
    pub step:        u64,
    pub time_before: SimTime,
    pub time_after:  SimTime,
    /// One entry per agent, in roster order.
    pub agents:      Vec<AgentStepInfo>,
    /// The match is over.
    pub terminated:  bool,
    /// The step limit was reached before the match ended.
    pub truncated:   bool,
}

impl StepOutcome {
    pub fn step_time_delta(&self) -> u64 {
        self.time_after.since(self.time_before)
    }

    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }

    pub fn agent(&self, name: &str) -> Option<&AgentStepInfo> {
        self.agents.iter().find(|a| a.agent == name)
    }
}

/// Per-agent totals over an episode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentReturn {
    pub agent:           String,
    pub team:            Alliance,
    pub total_reward:    f64,
    pub invalid_actions: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeSummary {
    pub steps:      u64,
    pub end_time:   SimTime,
    pub terminated: bool,
    pub truncated:  bool,
    pub score:      ScoreBoard,
    pub agents:     Vec<AgentReturn>,
}

pub(crate) struct AgentSlot {
    pub(crate) name:    String,
    pub(crate) team:    Alliance,
    pub(crate) radius:  f64,
    pub(crate) catalog: ActionCatalog,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Semi-Markov step loop over one [`GameServer`].
///
/// The scheduler owns the busy table and the [`CollisionRegistry`]; it
/// borrows the server for each call.  The server's clock is the only clock.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler<R: RewardModel> {
    pub(crate) config:  SchedulerConfig,
    pub(crate) reward:  R,
    pub(crate) agents:  Vec<AgentSlot>,
    pub(crate) busy:    BusyTable,
    pub(crate) traffic: CollisionRegistry,
    pub(crate) steps:   u64,
}

impl<R: RewardModel> Scheduler<R> {
    // ── Episode control ───────────────────────────────────────────────────

    /// Soft-reset the server, drop every registered trajectory and mark all
    /// agents free.
    pub fn reset<P: MotionPlanner>(&mut self, server: &mut GameServer<P>) {
        server.soft_reset();
        self.traffic.clear_all_active_trajectories();
        self.busy.reset(server.current_time());
        self.steps = 0;
    }

    /// Execute one step.
    ///
    /// `actions` pairs agent names with catalog indices and is dispatched in
    /// the given order: each trajectory is registered before the next agent
    /// plans, so later agents avoid earlier ones but not the reverse.
    /// Every free agent dispatches at the step-start time and its journal is
    /// applied immediately, so a later agent's effect already sees the
    /// changes of earlier agents in the same step even when those agents
    /// finish after it.  Entries for busy agents are ignored, as are repeats
    /// and unknown names.  A free agent with no entry waits.
    pub fn step<P: MotionPlanner>(
        &mut self,
        server:  &mut GameServer<P>,
        actions: &[(&str, usize)],
    ) -> SchedResult<StepOutcome> {
        self.steps += 1;
        let now = server.current_time();
        let before = ScoreBoard::read(server.state());

        let mut infos: Vec<Option<AgentStepInfo>> = vec![None; self.agents.len()];
        for &(name, index) in actions {
            let Some(i) = self.index_of(name) else {
                warn!(agent = name, "action submitted for unknown agent");
                continue;
            };
            if infos[i].is_none() {
                infos[i] = Some(self.act(server, i, Some(index), now));
            }
        }
        for i in 0..infos.len() {
            if infos[i].is_none() {
                infos[i] = Some(self.act(server, i, None, now));
            }
        }

        // ── Advance the clock ─────────────────────────────────────────────
        let target = if self.config.event_stepping {
            self.busy.next_event(now)
        } else {
            Some(now.offset(self.config.wait_quantum_ms))
        };
        if let Some(t) = target {
            server.advance_to(t)?;
        }

        let time_after = server.current_time();
        let after = ScoreBoard::read(server.state());
        let terminated = server.is_game_over();
        let truncated = !terminated && self.config.max_episode_steps.is_some_and(|m| self.steps >= m);

        let agents: Vec<AgentStepInfo> = infos
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, mut info)| {
                info.is_free = self.busy.is_free(i, time_after);
                info.reward = self.reward.reward(&RewardInput {
                    agent:                  &info.agent,
                    team:                   self.agents[i].team,
                    action_valid:           info.action_valid,
                    before:                 &before,
                    after:                  &after,
                    invalid_action_penalty: self.config.invalid_action_penalty,
                });
                info
            })
            .collect();

        debug!(
            step = self.steps,
            from = %now,
            to = %time_after,
            score = after.total,
            "step complete"
        );

        Ok(StepOutcome {
            step: self.steps,
            time_before: now,
            time_after,
            agents,
            terminated,
            truncated,
        })
    }

    /// Reset, then step with `policy` choosing for every free agent until the
    /// match ends or the step limit is hit.
    pub fn run_episode<P, Pol, O>(
        &mut self,
        server:   &mut GameServer<P>,
        policy:   &mut Pol,
        observer: &mut O,
    ) -> SchedResult<EpisodeSummary>
    where
        P: MotionPlanner,
        Pol: Policy + ?Sized,
        O: MatchObserver + ?Sized,
    {
        self.reset(server);
        let names: Vec<String> = self.agents.iter().map(|a| a.name.clone()).collect();
        policy.reset(&names, self.config.seed);
        observer.on_episode_start(server.state());

        let mut totals: Vec<(f64, u64)> = vec![(0.0, 0); names.len()];
        let outcome = loop {
            let now = server.current_time();
            observer.on_step_start(self.steps + 1, now);

            let mut actions: Vec<(&str, usize)> = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                if self.busy.is_free(i, now) {
                    let choice = policy.choose(i, name, &self.agents[i].catalog, server.state());
                    actions.push((name.as_str(), choice));
                }
            }

            let outcome = self.step(server, &actions)?;
            for (total, info) in totals.iter_mut().zip(&outcome.agents) {
                total.0 += info.reward;
                if !info.action_valid {
                    total.1 += 1;
                }
            }
            observer.on_step_end(&outcome, server.state());
            if outcome.is_done() {
                break outcome;
            }
        };

        let summary = EpisodeSummary {
            steps:      outcome.step,
            end_time:   outcome.time_after,
            terminated: outcome.terminated,
            truncated:  outcome.truncated,
            score:      ScoreBoard::read(server.state()),
            agents:     self
                .agents
                .iter()
                .zip(totals)
                .map(|(slot, (total_reward, invalid_actions))| AgentReturn {
                    agent: slot.name.clone(),
                    team: slot.team,
                    total_reward,
                    invalid_actions,
                })
                .collect(),
        };
        info!(
            steps = summary.steps,
            end = %summary.end_time,
            red = summary.score.red,
            blue = summary.score.blue,
            "episode complete"
        );
        observer.on_episode_end(&summary, server.log());
        Ok(summary)
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Agent names in roster order.
    pub fn agents(&self) -> impl Iterator<Item = &str> + '_ {
        self.agents.iter().map(|a| a.name.as_str())
    }

    pub fn catalog(&self, agent: &str) -> Option<&ActionCatalog> {
        self.index_of(agent).map(|i| &self.agents[i].catalog)
    }

    pub fn busy_until(&self, agent: &str) -> Option<SimTime> {
        self.index_of(agent).and_then(|i| self.busy.busy_until(i))
    }

    pub fn is_free(&self, agent: &str, now: SimTime) -> bool {
        self.index_of(agent).is_some_and(|i| self.busy.is_free(i, now))
    }

    /// Agents free at `now`, in roster order.
    pub fn free_agents(&self, now: SimTime) -> Vec<&str> {
        self.busy.free_at(now).map(|i| self.agents[i].name.as_str()).collect()
    }

    pub fn traffic(&self) -> &CollisionRegistry {
        &self.traffic
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn index_of(&self, agent: &str) -> Option<usize> {
        self.agents.iter().position(|a| a.name == agent)
    }

    /// Handle agent `i` at step start `now`.  `None` means no submission.
    fn act<P: MotionPlanner>(
        &mut self,
        server: &mut GameServer<P>,
        i:      usize,
        choice: Option<usize>,
        now:    SimTime,
    ) -> AgentStepInfo {
        let quantum = self.config.wait_quantum_ms;
        let name = self.agents[i].name.clone();

        if !self.busy.is_free(i, now) {
            return AgentStepInfo::new(&name, BUSY, true);
        }

        let key = match choice {
            None => ActionKey::wait(),
            Some(index) => match self.agents[i].catalog.get(index) {
                Some(key) => key.clone(),
                None => {
                    debug!(agent = %name, index, "catalog index out of range");
                    self.busy.set(i, now.offset(quantum));
                    let mut info = AgentStepInfo::new(&name, INVALID, false);
                    info.action_ms = quantum;
                    return info;
                }
            },
        };

        if key.is_wait() {
            self.busy.set(i, now.offset(quantum));
            let mut info = AgentStepInfo::new(&name, WAIT, true);
            info.action_ms = quantum;
            return info;
        }

        let label = key.label();
        match server.dispatch(&key.interactable, &key.interaction, &name, &self.traffic) {
            Ok(outcome) => {
                if let Some(t) = &outcome.trajectory {
                    self.traffic
                        .register_active_trajectory(&name, Arc::clone(t), now, self.agents[i].radius);
                }
                let elapsed = match outcome.elapsed_ms() {
                    0 => quantum,
                    ms => ms,
                };
                self.busy.set(i, now.offset(elapsed));
                AgentStepInfo {
                    agent:         name,
                    action_valid:  outcome.success,
                    action_label:  label,
                    is_free:       false,
                    trajectory_ms: outcome.trajectory.as_ref().map_or(0, |t| t.travel_ms()),
                    trajectory:    outcome.trajectory,
                    action_ms:     elapsed,
                    reward:        0.0,
                }
            }
            Err(e) => {
                warn!(agent = %name, action = %label, error = %e, "action failed");
                self.busy.set(i, now.offset(quantum));
                let mut info = AgentStepInfo::new(&name, label, false);
                info.action_ms = quantum;
                info
            }
        }
    }
}
