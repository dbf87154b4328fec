//! Unit tests for ms-output.

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{LogEntryRow, RobotSnapshotRow, StepSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snapshot(robot: &str, step: u64) -> RobotSnapshotRow {
        RobotSnapshotRow {
            episode: 0,
            step,
            time_ms: step * 100,
            robot:   robot.to_owned(),
            team:    "red",
            x:       1.5,
            y:       2.25,
            heading: 0.0,
            held:    1,
            is_free: false,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        for file in ["robot_snapshots.csv", "step_summaries.csv", "match_log.csv"] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }

    #[test]
    fn csv_snapshot_header_and_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snapshot("red_1", 1), snapshot("red_2", 1)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            ["episode", "step", "time_ms", "robot", "team", "x", "y", "heading", "held", "is_free"]
        );
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][3], "red_2");
        assert_eq!(&rows[0][5], "1.500");
        assert_eq!(&rows[0][6], "2.250");
        assert_eq!(&rows[0][9], "0"); // busy
    }

    #[test]
    fn csv_step_summary() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            episode:         2,
            step:            7,
            time_before_ms:  600,
            time_after_ms:   1_350,
            score:           10,
            red_score:       5,
            blue_score:      5,
            invalid_actions: 1,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "2");
        assert_eq!(&rows[0][3], "1350");
        assert_eq!(&rows[0][7], "1");
    }

    #[test]
    fn csv_log_quotes_descriptions() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_log(&[LogEntryRow {
            episode:     0,
            time_ms:     4_000,
            kind:        "interaction",
            robot:       "blue_1".into(),
            description: "goal:SCORE, 5 points".into(),
            changes:     3,
        }])
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("match_log.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][4], "goal:SCORE, 5 points");
        assert_eq!(&rows[0][5], "3");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
        w.write_log(&[]).unwrap();
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use ms_core::{Alliance, EngineContext, MatchTiming, Pose};
    use ms_interact::stations::{pickup_station, scoring_goal};
    use ms_motion::{GridPlanner, RobotDescriptor};
    use ms_sched::{RandomPolicy, SchedulerBuilder, SchedulerConfig, WaitPolicy};
    use ms_server::{Game, GameServer, ServerConfig};
    use ms_state::RobotState;
    use tempfile::TempDir;

    use crate::{CsvWriter, MatchOutputObserver};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn server() -> GameServer<GridPlanner> {
        let game = Game::new("output field", 12.0, 6.0)
            .with_timing(MatchTiming { auto_secs: 1, teleop_secs: 5, endgame_secs: 2 })
            .with_interactable(pickup_station("loader", Pose::new(2.0, 3.0, std::f64::consts::PI), "cone", 4).unwrap())
            .unwrap()
            .with_interactable(scoring_goal("goal", Pose::new(10.0, 3.0, 0.0), "cone", 5).unwrap())
            .unwrap();
        let mut s =
            GameServer::load_from_game(Arc::new(game), GridPlanner::default(), ServerConfig::default(), EngineContext::new(5))
                .unwrap();
        let desc = RobotDescriptor::new(0.4, 3.0);
        s.init_robot(RobotState::new("red_1", Alliance::Red, Pose::new(3.0, 1.0, 0.0)).with_gamepiece("cone", 0), desc)
            .unwrap();
        s.init_robot(RobotState::new("blue_1", Alliance::Blue, Pose::new(9.0, 5.0, 0.0)).with_gamepiece("cone", 1), desc)
            .unwrap();
        s
    }

    fn rows(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn truncated_episode_rows() {
        let mut s = server();
        let config = SchedulerConfig { max_episode_steps: Some(3), ..SchedulerConfig::default() };
        let mut sched = SchedulerBuilder::new(config).build(&s).unwrap();

        let dir = tmp();
        let mut obs = MatchOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sched.run_episode(&mut s, &mut WaitPolicy, &mut obs).unwrap();
        obs.finish().unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let summaries = rows(&dir, "step_summaries.csv");
        assert_eq!(summaries.len(), 3);
        assert_eq!(&summaries[2][3], "300");

        // 3 steps × 2 robots
        let snapshots = rows(&dir, "robot_snapshots.csv");
        assert_eq!(snapshots.len(), 6);
        let blue: Vec<_> = snapshots.iter().filter(|r| &r[3] == "blue_1").collect();
        assert_eq!(blue.len(), 3);
        assert_eq!(&blue[0][4], "blue");
        assert_eq!(&blue[0][8], "1");
        assert!(snapshots.iter().all(|r| &r[9] == "1"));
    }

    #[test]
    fn snapshot_interval_thins_rows() {
        let mut s = server();
        let config = SchedulerConfig { max_episode_steps: Some(4), ..SchedulerConfig::default() };
        let mut sched = SchedulerBuilder::new(config).build(&s).unwrap();

        let dir = tmp();
        let mut obs = MatchOutputObserver::new(CsvWriter::new(dir.path()).unwrap()).with_snapshot_interval(2);
        sched.run_episode(&mut s, &mut WaitPolicy, &mut obs).unwrap();
        obs.finish().unwrap();

        // steps 2 and 4 only
        assert_eq!(rows(&dir, "robot_snapshots.csv").len(), 4);
        assert_eq!(rows(&dir, "step_summaries.csv").len(), 4);
    }

    #[test]
    fn match_log_written_at_episode_end() {
        let mut s = server();
        let mut sched = SchedulerBuilder::new(SchedulerConfig { seed: 9, ..SchedulerConfig::default() })
            .build(&s)
            .unwrap();

        let dir = tmp();
        let mut obs = MatchOutputObserver::new(CsvWriter::new(dir.path()).unwrap()).with_snapshot_interval(0);
        let summary = sched.run_episode(&mut s, &mut RandomPolicy::new(), &mut obs).unwrap();
        obs.finish().unwrap();
        assert!(obs.take_error().is_none());

        assert_eq!(rows(&dir, "robot_snapshots.csv").len(), 0);
        assert_eq!(rows(&dir, "step_summaries.csv").len() as u64, summary.steps);
        let log = rows(&dir, "match_log.csv");
        assert_eq!(log.len(), s.log().len());
        for (row, receipt) in log.iter().zip(s.log().iter()) {
            assert_eq!(&row[2], receipt.kind.as_str());
            assert_eq!(row[1].parse::<u64>().unwrap(), receipt.time.0);
        }
    }

    #[test]
    fn episodes_are_numbered() {
        let mut s = server();
        let config = SchedulerConfig { max_episode_steps: Some(2), ..SchedulerConfig::default() };
        let mut sched = SchedulerBuilder::new(config).build(&s).unwrap();

        let dir = tmp();
        let mut obs = MatchOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sched.run_episode(&mut s, &mut WaitPolicy, &mut obs).unwrap();
        sched.run_episode(&mut s, &mut WaitPolicy, &mut obs).unwrap();
        obs.finish().unwrap();
        assert_eq!(obs.episode(), 1);

        let episodes: Vec<String> = rows(&dir, "step_summaries.csv").iter().map(|r| r[0].to_owned()).collect();
        assert_eq!(episodes, ["0", "0", "1", "1"]);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{LogEntryRow, RobotSnapshotRow, StepSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_free_flag_as_integer() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[RobotSnapshotRow {
            episode: 0,
            step:    1,
            time_ms: 100,
            robot:   "red_1".into(),
            team:    "red",
            x:       1.0,
            y:       2.0,
            heading: 0.5,
            held:    0,
            is_free: true,
        }])
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (free, team): (i64, String) = conn
            .query_row("SELECT is_free, team FROM robot_snapshots WHERE robot = 'red_1'", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(free, 1);
        assert_eq!(team, "red");
    }

    #[test]
    fn sqlite_step_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            episode:         0,
            step:            4,
            time_before_ms:  300,
            time_after_ms:   900,
            score:           5,
            red_score:       0,
            blue_score:      5,
            invalid_actions: 0,
        })
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (after, blue): (i64, i64) = conn
            .query_row("SELECT time_after_ms, blue_score FROM step_summaries WHERE step = 4", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(after, 900);
        assert_eq!(blue, 5);
    }

    #[test]
    fn sqlite_rule_receipt_has_null_robot() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_log(&[LogEntryRow {
            episode:     0,
            time_ms:     12_000,
            kind:        "rule",
            robot:       String::new(),
            description: "parking bonus".into(),
            changes:     2,
        }])
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let robot: Option<String> = conn
            .query_row("SELECT robot FROM match_log WHERE kind = 'rule'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(robot, None);
    }
}
