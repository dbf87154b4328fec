//! The `GameServer` and its action pipeline.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use ms_core::{EngineContext, MatchClock, Pose, SimTime};
use ms_interact::{
    ActionCatalog, ActionKey, EffectScope, EntityRef, InteractError, Interactable, Interaction,
};
use ms_motion::{
    CollisionRegistry, MotionPlanner, RobotDescriptor, SharedTrajectory, Trajectory,
    TrajectoryRequest, TraversalMap,
};
use ms_state::{apply_journal, RobotState, StateError, StateSpace, ValueChange, INTERACTABLES, ROBOTS};

use crate::cache::{CacheStats, TrajectoryCache};
use crate::log::{MatchLog, Receipt, ReceiptKind};
use crate::{Game, ServerError, ServerResult};

/// Global score cells created at load.
pub const SCORE_CELLS: [&str; 3] = ["score", "red_score", "blue_score"];

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Occupancy grid cell size for traversal maps, metres.
    pub grid_resolution: f64,
    /// Extra distance kept from obstacles and walls beyond the footprint,
    /// metres.
    pub clearance:       f64,
    /// Trajectory cache quantisation step.
    pub cache_precision: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 0.1,
            clearance:       0.05,
            cache_precision: 0.1,
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why an action reported `success = false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionFailure {
    /// The interactable or interaction is not registered.
    UnknownAction,
    /// The planner found no path or no trajectory.
    NoPath,
    /// The effect refused in the current state.
    Infeasible,
    /// The match ends before the action would complete.
    MatchOver,
}

impl ActionFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionFailure::UnknownAction => "unknown_action",
            ActionFailure::NoPath        => "no_path",
            ActionFailure::Infeasible    => "infeasible",
            ActionFailure::MatchOver     => "match_over",
        }
    }
}

/// Result of driving to an interactable and interacting with it.
#[derive(Clone, Debug)]
pub struct DriveOutcome {
    pub success:    bool,
    pub trajectory: Option<SharedTrajectory>,
    /// Time spent driving, ms.
    pub travel_ms:  u64,
    /// Time spent interacting after arrival, ms.
    pub action_ms:  u64,
    pub failure:    Option<ActionFailure>,
}

impl DriveOutcome {
    fn failed(failure: ActionFailure) -> Self {
        Self {
            success:    false,
            trajectory: None,
            travel_ms:  0,
            action_ms:  0,
            failure:    Some(failure),
        }
    }

    /// Total time the action consumed.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.travel_ms + self.action_ms
    }
}

/// What happened when an interaction was evaluated at the target.
enum InteractStep {
    Applied { duration_ms: u64 },
    Infeasible,
    PastDeadline,
}

struct RobotEntry {
    name:       String,
    descriptor: RobotDescriptor,
}

// ── GameServer ────────────────────────────────────────────────────────────────

/// Owns the state of one match and executes actions against it.
///
/// # Time
///
/// The server's [`MatchClock`] is the only clock.  It moves forward through
/// [`process_action`][Self::process_action],
/// [`drive_and_process_action`][Self::drive_and_process_action],
/// [`update`][Self::update] and [`advance_to`][Self::advance_to]; every
/// advance evaluates the game's [`MatchRule`][crate::MatchRule]s.
/// [`dispatch`][Self::dispatch] executes an action at the current time and
/// reports how long it takes without moving the clock, which lets a
/// scheduler start several robots at the same instant.
pub struct GameServer<P: MotionPlanner> {
    ctx:      EngineContext,
    config:   ServerConfig,
    game:     Arc<Game>,
    planner:  P,
    robots:   Vec<RobotEntry>,
    state:    StateSpace,
    /// State right after the last registration; restored by `soft_reset`.
    baseline: StateSpace,
    clock:    MatchClock,
    maps:     FxHashMap<String, Arc<TraversalMap>>,
    cache:    TrajectoryCache,
    log:      MatchLog,
}

impl<P: MotionPlanner> GameServer<P> {
    // ── Setup ─────────────────────────────────────────────────────────────

    /// Build a server for `game`: create the global score cells and the
    /// `robots`/`interactables` sub-spaces, and register every
    /// interactable's initial state.
    pub fn load_from_game(
        game:    Arc<Game>,
        planner: P,
        config:  ServerConfig,
        ctx:     EngineContext,
    ) -> ServerResult<Self> {
        game.validate()?;

        let mut state = StateSpace::new();
        for cell in SCORE_CELLS {
            state.define(cell, 0i64)?;
        }
        state.create_sub_space(ROBOTS)?;
        state.create_sub_space(INTERACTABLES)?;
        for obj in game.registry().iter() {
            state.register(INTERACTABLES, obj.name.clone(), obj.initial_state.clone())?;
        }

        info!(
            game = %game.name,
            interactables = game.registry().len(),
            rules = game.rules().len(),
            "game loaded"
        );

        Ok(Self {
            clock:    MatchClock::new(game.timing),
            cache:    TrajectoryCache::new(config.cache_precision),
            baseline: state.clone(),
            state,
            ctx,
            config,
            game,
            planner,
            robots:   Vec::new(),
            maps:     FxHashMap::default(),
            log:      MatchLog::new(),
        })
    }

    /// Register a robot with its initial snapshot.
    pub fn init_robot(&mut self, robot: RobotState, descriptor: RobotDescriptor) -> ServerResult<()> {
        descriptor.validate()?;
        if self.robots.iter().any(|r| r.name == robot.name) {
            return Err(ServerError::Duplicate { what: "robot", name: robot.name });
        }
        let bundle = robot.to_space();
        self.state.register(ROBOTS, robot.name.clone(), bundle.clone())?;
        self.baseline.register(ROBOTS, robot.name.clone(), bundle)?;
        debug!(robot = %robot.name, team = %robot.team, "robot registered");
        self.robots.push(RobotEntry { name: robot.name, descriptor });
        Ok(())
    }

    /// Restore the state captured after registration, rewind the clock and
    /// clear the log.  The game, planner, traversal maps and trajectory cache
    /// are kept.
    pub fn soft_reset(&mut self) {
        self.state = self.baseline.clone();
        self.clock.reset();
        self.log.clear();
        debug!(game = %self.game.name, "soft reset");
    }

    // ── Catalog ───────────────────────────────────────────────────────────

    /// Every (interactable, interaction) pair, regardless of feasibility.
    pub fn get_actions_set(&self, robot: &str) -> ServerResult<Vec<ActionKey>> {
        self.robot_entry(robot)?;
        Ok(self.game.registry().action_keys())
    }

    /// [`get_actions_set`][Self::get_actions_set] with WAIT at index 0.
    pub fn action_catalog(&self, robot: &str) -> ServerResult<ActionCatalog> {
        Ok(ActionCatalog::new(self.get_actions_set(robot)?))
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Apply an interaction where the robot stands, then advance the clock
    /// by its duration.
    ///
    /// Returns `Ok(false)` when the effect is infeasible or the match would
    /// end first; nothing is applied in that case.  Unknown names are
    /// errors.  A fault part way through the journal leaves the earlier
    /// changes applied and returns [`ServerError::ExecutionFault`].
    pub fn process_action(
        &mut self,
        interactable: &str,
        interaction:  &str,
        robot:        &str,
    ) -> ServerResult<bool> {
        let game = Arc::clone(&self.game);
        let (obj, action) = game.registry().resolve(interactable, interaction)?;
        self.robot_entry(robot)?;
        let now = self.clock.now();
        match self.interact(obj, interaction, action.as_ref(), robot, now)? {
            InteractStep::Applied { duration_ms } => {
                self.advance(duration_ms)?;
                Ok(true)
            }
            InteractStep::Infeasible | InteractStep::PastDeadline => Ok(false),
        }
    }

    /// Drive to the interactable, interact, and advance the clock by the
    /// time consumed.
    pub fn drive_and_process_action(
        &mut self,
        interactable: &str,
        interaction:  &str,
        robot:        &str,
        traffic:      &CollisionRegistry,
    ) -> ServerResult<DriveOutcome> {
        let outcome = self.dispatch(interactable, interaction, robot, traffic)?;
        self.advance(outcome.elapsed_ms())?;
        Ok(outcome)
    }

    /// Drive and interact starting at the current time, without moving the
    /// clock.
    ///
    /// Unknown actions, missing paths, infeasible effects and actions that
    /// would finish after the buzzer come back as `success = false`.  An
    /// unknown robot is an error, and so is a faulting effect.
    pub fn dispatch(
        &mut self,
        interactable: &str,
        interaction:  &str,
        robot:        &str,
        traffic:      &CollisionRegistry,
    ) -> ServerResult<DriveOutcome> {
        let descriptor = self.robot_entry(robot)?.descriptor;
        let game = Arc::clone(&self.game);
        let now = self.clock.now();
        let Ok((obj, action)) = game.registry().resolve(interactable, interaction) else {
            warn!(robot, interactable, interaction, "unknown action");
            self.log_failure(robot, now, format!("unknown action {interactable}:{interaction}"));
            return Ok(DriveOutcome::failed(ActionFailure::UnknownAction));
        };

        if self.clock.is_over() {
            return Ok(DriveOutcome::failed(ActionFailure::MatchOver));
        }

        let start = self.robot_pose(robot)?;
        let goal = obj.navigation_for(action.as_ref());
        let trajectory = if start.distance(goal) < 1e-6 && start.turn_to(goal) < 1e-6 {
            None
        } else {
            match self.plan(robot, &descriptor, start, goal, traffic, now)? {
                Some(t) => Some(t),
                None => {
                    debug!(robot, target = %obj.name, "no path");
                    self.log_failure(robot, now, format!("no path to {}", obj.name));
                    return Ok(DriveOutcome::failed(ActionFailure::NoPath));
                }
            }
        };

        let travel_ms = trajectory.as_ref().map_or(0, |t| t.travel_ms());
        let arrive = now.offset(travel_ms);
        let end = self.clock.timing.end();
        if arrive > end {
            self.log_failure(robot, now, format!("cannot reach {} before the buzzer", obj.name));
            return Ok(DriveOutcome {
                success:    false,
                trajectory: None,
                travel_ms:  end.since(now),
                action_ms:  0,
                failure:    Some(ActionFailure::MatchOver),
            });
        }

        if trajectory.is_some() {
            let moves = RobotState::pose_changes(robot, goal);
            apply_journal(&mut self.state, &moves)?;
            self.log.push(Receipt {
                time:        arrive,
                kind:        ReceiptKind::Drive,
                robot:       Some(robot.to_owned()),
                description: format!("drive to {}", obj.name),
                changes:     moves,
            });
        }

        let outcome = match self.interact(obj, interaction, action.as_ref(), robot, arrive)? {
            InteractStep::Applied { duration_ms } => DriveOutcome {
                success: true,
                trajectory,
                travel_ms,
                action_ms: duration_ms,
                failure: None,
            },
            InteractStep::Infeasible => DriveOutcome {
                success: false,
                trajectory,
                travel_ms,
                action_ms: 0,
                failure: Some(ActionFailure::Infeasible),
            },
            InteractStep::PastDeadline => DriveOutcome {
                success: false,
                trajectory,
                travel_ms,
                action_ms: end.since(arrive),
                failure: Some(ActionFailure::MatchOver),
            },
        };
        debug!(
            robot,
            interactable,
            interaction,
            success = outcome.success,
            elapsed_ms = outcome.elapsed_ms(),
            "dispatched"
        );
        Ok(outcome)
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    /// Advance the clock by `dt_ms`.  Returns `true` once the match is over.
    pub fn update(&mut self, dt_ms: u64) -> ServerResult<bool> {
        self.advance(dt_ms)?;
        Ok(self.is_game_over())
    }

    /// Advance the clock to `t` (no-op if `t` is not in the future).
    pub fn advance_to(&mut self, t: SimTime) -> ServerResult<bool> {
        let dt = t.since(self.clock.now());
        self.update(dt)
    }

    pub fn is_game_over(&self) -> bool {
        self.clock.is_over()
    }

    pub fn current_time(&self) -> SimTime {
        self.clock.now()
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn state(&self) -> &StateSpace {
        &self.state
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn log(&self) -> &MatchLog {
        &self.log
    }

    pub fn game(&self) -> &Arc<Game> {
        &self.game
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Robot names in registration order.
    pub fn robot_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.robots.iter().map(|r| r.name.as_str())
    }

    pub fn descriptor(&self, robot: &str) -> ServerResult<&RobotDescriptor> {
        Ok(&self.robot_entry(robot)?.descriptor)
    }

    pub fn robot_state(&self, robot: &str) -> ServerResult<RobotState> {
        Ok(RobotState::from_space(robot, self.state.get(ROBOTS, robot)?)?)
    }

    /// Integer global cell, zero if absent.
    pub fn global_int(&self, key: &str) -> i64 {
        self.state.value(key).and_then(|v| v.as_int()).unwrap_or(0)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn robot_entry(&self, robot: &str) -> ServerResult<&RobotEntry> {
        self.robots
            .iter()
            .find(|r| r.name == robot)
            .ok_or_else(|| ServerError::not_found("robot", robot))
    }

    fn robot_pose(&self, robot: &str) -> ServerResult<Pose> {
        Ok(self.robot_state(robot)?.pose)
    }

    fn advance(&mut self, ms: u64) -> ServerResult<()> {
        if ms == 0 {
            return Ok(());
        }
        let previous = self.clock.now();
        let now = self.clock.advance(ms);
        self.apply_rules(previous, now)
    }

    fn apply_rules(&mut self, previous: SimTime, now: SimTime) -> ServerResult<()> {
        let game = Arc::clone(&self.game);
        for rule in game.rules() {
            let journal = rule.evaluate(&self.state, previous, now, &self.clock.timing);
            if journal.is_empty() {
                continue;
            }
            match apply_journal(&mut self.state, &journal) {
                Ok(_) => {
                    debug!(rule = rule.name(), changes = journal.len(), "rule fired");
                    self.log.push(Receipt {
                        time:        now,
                        kind:        ReceiptKind::Rule,
                        robot:       None,
                        description: rule.name().to_owned(),
                        changes:     journal,
                    });
                }
                Err(e) => return Err(self.journal_fault(rule.name().to_owned(), None, now, journal, e)),
            }
        }
        Ok(())
    }

    fn scope<'a>(&'a self, target: &'a str, robot: &'a str, now: SimTime) -> ServerResult<EffectScope<'a>> {
        Ok(EffectScope {
            actor: EntityRef {
                sub_space: ROBOTS,
                name:      robot,
                state:     self.state.get(ROBOTS, robot)?,
            },
            target: EntityRef {
                sub_space: INTERACTABLES,
                name:      target,
                state:     self.state.get(INTERACTABLES, target)?,
            },
            global: &self.state,
            now,
        })
    }

    /// Evaluate `action` for `robot` at time `at` and apply its journal.
    fn interact(
        &mut self,
        obj:    &Interactable,
        name:   &str,
        action: &dyn Interaction,
        robot:  &str,
        at:     SimTime,
    ) -> ServerResult<InteractStep> {
        let label = format!("{}:{name}", obj.name);
        let evaluated = {
            let scope = self.scope(&obj.name, robot, at)?;
            let duration_ms = SimTime::ms_from_secs(action.duration_estimate(&scope));
            action.effect(&scope).map(|journal| (journal, duration_ms))
        };

        let (journal, duration_ms) = match evaluated {
            Ok(ok) => ok,
            Err(InteractError::Infeasible(reason)) => {
                debug!(robot, action = %label, %reason, "infeasible");
                self.log_failure(robot, at, format!("{label}: {reason}"));
                return Ok(InteractStep::Infeasible);
            }
            Err(e) => {
                warn!(robot, action = %label, error = %e, "effect fault");
                let detail = e.to_string();
                return Err(ServerError::ExecutionFault { action: label, applied: 0, total: 0, detail });
            }
        };

        let done = at.offset(duration_ms);
        if done > self.clock.timing.end() {
            self.log_failure(robot, at, format!("{label} would finish after the buzzer"));
            return Ok(InteractStep::PastDeadline);
        }

        match apply_journal(&mut self.state, &journal) {
            Ok(_) => {
                self.log.push(Receipt {
                    time:        done,
                    kind:        ReceiptKind::Interaction,
                    robot:       Some(robot.to_owned()),
                    description: action_description(&label, action),
                    changes:     journal,
                });
                Ok(InteractStep::Applied { duration_ms })
            }
            Err(e) => Err(self.journal_fault(label, Some(robot), done, journal, e)),
        }
    }

    /// Log the applied prefix of a broken journal and build the error.
    fn journal_fault(
        &mut self,
        action:  String,
        robot:   Option<&str>,
        at:      SimTime,
        journal: Vec<ValueChange>,
        err:     StateError,
    ) -> ServerError {
        let (applied, total, detail) = match err {
            StateError::PartialJournal { applied, total, source } => (applied, total, source.to_string()),
            other => (0, journal.len(), other.to_string()),
        };
        warn!(action = %action, applied, total, %detail, "journal fault");
        let mut changes = journal;
        changes.truncate(applied);
        self.log.push(Receipt {
            time:        at,
            kind:        ReceiptKind::Failure,
            robot:       robot.map(str::to_owned),
            description: format!("{action}: {detail}"),
            changes,
        });
        ServerError::ExecutionFault { action, applied, total, detail }
    }

    fn log_failure(&mut self, robot: &str, at: SimTime, description: String) {
        self.log.push(Receipt {
            time:        at,
            kind:        ReceiptKind::Failure,
            robot:       Some(robot.to_owned()),
            description,
            changes:     Vec::new(),
        });
    }

    fn plan(
        &mut self,
        robot:      &str,
        descriptor: &RobotDescriptor,
        start:      Pose,
        goal:       Pose,
        traffic:    &CollisionRegistry,
        now:        SimTime,
    ) -> ServerResult<Option<SharedTrajectory>> {
        let caps = self.ctx.capabilities;
        let busy_field = caps.dynamic_avoidance && traffic.has_live_others(robot, now);
        let use_cache = caps.trajectory_cache && !busy_field;

        if use_cache {
            if let Some(t) = self.cache.get(robot, start, goal) {
                return Ok(Some(t));
            }
        }

        let map = self.traversal_map(robot, descriptor)?;
        let Some(path) = self.planner.find_path(&map, start.point(), goal.point()) else {
            return Ok(None);
        };
        let request = TrajectoryRequest {
            agent:      robot,
            robot:      descriptor,
            start,
            goal,
            path:       &path,
            map:        &map,
            obstacles:  caps.dynamic_avoidance.then_some(traffic),
            start_time: now,
        };
        let trajectory = self.planner.generate_trajectory(&request);

        if use_cache {
            if let Some(t) = &trajectory {
                self.cache.insert(robot, start, goal, Arc::clone(t));
            }
        }
        Ok(trajectory)
    }

    fn traversal_map(&mut self, robot: &str, descriptor: &RobotDescriptor) -> ServerResult<Arc<TraversalMap>> {
        if let Some(map) = self.maps.get(robot) {
            return Ok(Arc::clone(map));
        }
        let map = Arc::new(TraversalMap::new(
            self.game.field_width,
            self.game.field_height,
            &self.game.obstacles,
            descriptor.footprint_radius + self.config.clearance,
            self.config.grid_resolution,
        )?);
        self.maps.insert(robot.to_owned(), Arc::clone(&map));
        Ok(map)
    }
}

fn action_description(label: &str, action: &dyn Interaction) -> String {
    match action.description() {
        "" => label.to_owned(),
        d  => format!("{label}: {d}"),
    }
}
