//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `robot_snapshots`, `step_summaries` and `match_log`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{LogEntryRow, OutputResult, RobotSnapshotRow, StepSummaryRow};

/// Writes match output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS robot_snapshots (
                 episode INTEGER NOT NULL,
                 step    INTEGER NOT NULL,
                 time_ms INTEGER NOT NULL,
                 robot   TEXT    NOT NULL,
                 team    TEXT    NOT NULL,
                 x       REAL    NOT NULL,
                 y       REAL    NOT NULL,
                 heading REAL    NOT NULL,
                 held    INTEGER NOT NULL,
                 is_free INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS step_summaries (
                 episode         INTEGER NOT NULL,
                 step            INTEGER NOT NULL,
                 time_before_ms  INTEGER NOT NULL,
                 time_after_ms   INTEGER NOT NULL,
                 score           INTEGER NOT NULL,
                 red_score       INTEGER NOT NULL,
                 blue_score      INTEGER NOT NULL,
                 invalid_actions INTEGER NOT NULL,
                 PRIMARY KEY (episode, step)
             );
             CREATE TABLE IF NOT EXISTS match_log (
                 episode     INTEGER NOT NULL,
                 time_ms     INTEGER NOT NULL,
                 kind        TEXT    NOT NULL,
                 robot       TEXT,
                 description TEXT    NOT NULL,
                 changes     INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO robot_snapshots \
                 (episode, step, time_ms, robot, team, x, y, heading, held, is_free) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.episode,
                    row.step,
                    row.time_ms,
                    row.robot,
                    row.team,
                    row.x,
                    row.y,
                    row.heading,
                    row.held,
                    row.is_free as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO step_summaries \
             (episode, step, time_before_ms, time_after_ms, score, red_score, blue_score, invalid_actions) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.episode,
                row.step,
                row.time_before_ms,
                row.time_after_ms,
                row.score,
                row.red_score,
                row.blue_score,
                row.invalid_actions,
            ],
        )?;
        Ok(())
    }

    fn write_log(&mut self, rows: &[LogEntryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO match_log (episode, time_ms, kind, robot, description, changes) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                let robot = (!row.robot.is_empty()).then_some(row.robot.as_str());
                stmt.execute(rusqlite::params![
                    row.episode,
                    row.time_ms,
                    row.kind,
                    robot,
                    row.description,
                    row.changes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
