//! The `OutputWriter` trait implemented by all backend writers.

use crate::{LogEntryRow, OutputResult, RobotSnapshotRow, StepSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors surface to [`MatchOutputObserver`][crate::MatchOutputObserver],
/// which stores the first one for [`take_error`][crate::MatchOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of robot snapshots.
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write a batch of match-log rows.
    fn write_log(&mut self, rows: &[LogEntryRow]) -> OutputResult<()>;

    /// Push buffered rows to disk without closing anything.
    fn flush(&mut self) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
