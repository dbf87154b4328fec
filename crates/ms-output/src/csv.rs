//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `robot_snapshots.csv`
//! - `step_summaries.csv`
//! - `match_log.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{LogEntryRow, OutputResult, RobotSnapshotRow, StepSummaryRow};

/// Writes match output to three CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    log:       Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("robot_snapshots.csv"))?;
        snapshots.write_record([
            "episode", "step", "time_ms", "robot", "team", "x", "y", "heading", "held", "is_free",
        ])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record([
            "episode", "step", "time_before_ms", "time_after_ms",
            "score", "red_score", "blue_score", "invalid_actions",
        ])?;

        let mut log = Writer::from_path(dir.join("match_log.csv"))?;
        log.write_record(["episode", "time_ms", "kind", "robot", "description", "changes"])?;

        Ok(Self { snapshots, summaries, log, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.episode.to_string(),
                row.step.to_string(),
                row.time_ms.to_string(),
                row.robot.clone(),
                row.team.to_owned(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.4}", row.heading),
                row.held.to_string(),
                (row.is_free as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.episode.to_string(),
            row.step.to_string(),
            row.time_before_ms.to_string(),
            row.time_after_ms.to_string(),
            row.score.to_string(),
            row.red_score.to_string(),
            row.blue_score.to_string(),
            row.invalid_actions.to_string(),
        ])?;
        Ok(())
    }

    fn write_log(&mut self, rows: &[LogEntryRow]) -> OutputResult<()> {
        for row in rows {
            self.log.write_record(&[
                row.episode.to_string(),
                row.time_ms.to_string(),
                row.kind.to_owned(),
                row.robot.clone(),
                row.description.clone(),
                row.changes.to_string(),
            ])?;
        }
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.log.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.flush()
    }
}
