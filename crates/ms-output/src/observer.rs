//! `MatchOutputObserver<W>` — bridges `MatchObserver` to an `OutputWriter`.

use ms_sched::{EpisodeSummary, MatchObserver, ScoreBoard, StepOutcome};
use ms_server::MatchLog;
use ms_state::{RobotState, StateResult, StateSpace, ROBOTS};
use tracing::warn;

use crate::row::{LogEntryRow, RobotSnapshotRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`MatchObserver`] that writes robot snapshots, step summaries and the
/// match log to any [`OutputWriter`] backend.
///
/// One observer may span several episodes run back to back; rows carry the
/// episode index, counted from 0.  Writer errors are stored because
/// observer callbacks have no return value; check them with
/// [`take_error`][Self::take_error] and call [`finish`][Self::finish] after
/// the last episode.
pub struct MatchOutputObserver<W: OutputWriter> {
    writer:            W,
    snapshot_interval: u64,
    episode:           u32,
    started:           u32,
    last_error:        Option<OutputError>,
}

impl<W: OutputWriter> MatchOutputObserver<W> {
    /// Create an observer that snapshots every step.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            snapshot_interval: 1,
            episode:           0,
            started:           0,
            last_error:        None,
        }
    }

    /// Snapshot robots every `steps` steps; 0 disables snapshots.
    pub fn with_snapshot_interval(mut self, steps: u64) -> Self {
        self.snapshot_interval = steps;
        self
    }

    /// Index of the current (or most recent) episode.
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush and close the writer.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn snapshot_rows(&self, outcome: &StepOutcome, state: &StateSpace) -> StateResult<Vec<RobotSnapshotRow>> {
        let mut rows = Vec::new();
        for name in state.entities(ROBOTS)? {
            let robot = RobotState::from_space(name, state.get(ROBOTS, name)?)?;
            rows.push(RobotSnapshotRow {
                episode: self.episode,
                step:    outcome.step,
                time_ms: outcome.time_after.0,
                team:    robot.team.as_str(),
                x:       robot.pose.x,
                y:       robot.pose.y,
                heading: robot.pose.heading,
                held:    robot.gamepieces.values().sum(),
                is_free: outcome.agent(name).is_some_and(|a| a.is_free),
                robot:   robot.name,
            });
        }
        Ok(rows)
    }
}

impl<W: OutputWriter> MatchObserver for MatchOutputObserver<W> {
    fn on_episode_start(&mut self, _state: &StateSpace) {
        self.episode = self.started;
        self.started += 1;
    }

    fn on_step_end(&mut self, outcome: &StepOutcome, state: &StateSpace) {
        let score = ScoreBoard::read(state);
        let row = StepSummaryRow {
            episode:         self.episode,
            step:            outcome.step,
            time_before_ms:  outcome.time_before.0,
            time_after_ms:   outcome.time_after.0,
            score:           score.total,
            red_score:       score.red,
            blue_score:      score.blue,
            invalid_actions: outcome.agents.iter().filter(|a| !a.action_valid).count() as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);

        if self.snapshot_interval == 0 || outcome.step % self.snapshot_interval != 0 {
            return;
        }
        match self.snapshot_rows(outcome, state) {
            Ok(rows) if !rows.is_empty() => {
                let result = self.writer.write_snapshots(&rows);
                self.store_err(result);
            }
            Ok(_) => {}
            Err(e) => warn!(step = outcome.step, error = %e, "robot snapshot skipped"),
        }
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary, log: &MatchLog) {
        let rows: Vec<LogEntryRow> = log
            .iter()
            .map(|r| LogEntryRow {
                episode:     self.episode,
                time_ms:     r.time.0,
                kind:        r.kind.as_str(),
                robot:       r.robot.clone().unwrap_or_default(),
                description: r.description.clone(),
                changes:     r.changes.len() as u64,
            })
            .collect();
        let result = self.writer.write_log(&rows);
        self.store_err(result);
        let result = self.writer.flush();
        self.store_err(result);
    }
}
