//! `ms-output` — match output writers for the matchsim engine.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                |
//! |-----------|---------|--------------------------------------------------------------|
//! | *(none)*  | CSV     | `robot_snapshots.csv`, `step_summaries.csv`, `match_log.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                  |
//!
//! Both implement [`OutputWriter`] and are driven by [`MatchOutputObserver`],
//! which implements `ms_sched::MatchObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ms_output::{CsvWriter, MatchOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = MatchOutputObserver::new(writer);
//! sched.run_episode(&mut server, &mut RandomPolicy::new(), &mut obs)?;
//! obs.finish()?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::MatchOutputObserver;
pub use row::{LogEntryRow, RobotSnapshotRow, StepSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
