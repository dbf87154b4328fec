//! CSV roster loader.
//!
//! # CSV format
//!
//! One row per robot.  `max_omega` and `pieces` may be left empty.
//!
//! ```csv
//! name,team,x,y,heading,radius,max_speed,max_omega,pieces
//! red_1,red,1.0,1.0,0.0,0.45,3.5,,cone=0;cube=0
//! blue_1,blue,15.0,7.0,3.14159,0.45,3.5,6.0,cone
//! ```
//!
//! **`pieces`** lists the gamepiece cells a robot carries, separated by `;`.
//! Each entry is `kind=count` or a bare `kind` (count 0).
//!
//! Rows keep file order, which becomes registration order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ms_core::{Alliance, Pose};
use ms_motion::RobotDescriptor;
use ms_state::RobotState;

use crate::{GameServer, ServerError, ServerResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RosterRecord {
    name:      String,
    team:      String,
    x:         f64,
    y:         f64,
    heading:   f64,
    radius:    f64,
    max_speed: f64,
    #[serde(default)]
    max_omega: Option<f64>,
    #[serde(default)]
    pieces:    Option<String>,
}

/// One robot as read from a roster file.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterEntry {
    pub state:      RobotState,
    pub descriptor: RobotDescriptor,
}

impl RosterEntry {
    pub fn new(state: RobotState, descriptor: RobotDescriptor) -> Self {
        Self { state, descriptor }
    }

    /// Register this robot on `server`.
    pub fn register<P: ms_motion::MotionPlanner>(&self, server: &mut GameServer<P>) -> ServerResult<()> {
        server.init_robot(self.state.clone(), self.descriptor)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a roster from a CSV file.
pub fn load_roster(path: &Path) -> ServerResult<Vec<RosterEntry>> {
    let file = std::fs::File::open(path).map_err(ServerError::Io)?;
    load_roster_reader(file)
}

/// Like [`load_roster`] but accepts any `Read` source.
pub fn load_roster_reader<R: Read>(reader: R) -> ServerResult<Vec<RosterEntry>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for (line, result) in csv_reader.deserialize::<RosterRecord>().enumerate() {
        let row = result.map_err(|e| ServerError::Parse(e.to_string()))?;
        let team: Alliance = row
            .team
            .parse()
            .map_err(|e| ServerError::Parse(format!("row {}: {e}", line + 1)))?;

        let mut state = RobotState::new(row.name.trim(), team, Pose::new(row.x, row.y, row.heading));
        if let Some(pieces) = row.pieces.as_deref() {
            for (kind, count) in parse_pieces(pieces)? {
                state = state.with_gamepiece(kind, count);
            }
        }

        let mut descriptor = RobotDescriptor::new(row.radius, row.max_speed);
        if let Some(omega) = row.max_omega {
            descriptor.max_omega = omega;
        }
        descriptor
            .validate()
            .map_err(|e| ServerError::Parse(format!("robot {:?}: {e}", row.name)))?;

        entries.push(RosterEntry { state, descriptor });
    }

    Ok(entries)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_pieces(s: &str) -> ServerResult<Vec<(&str, i64)>> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            None => Ok((p, 0)),
            Some((kind, n)) => n
                .trim()
                .parse::<i64>()
                .map(|count| (kind.trim(), count))
                .map_err(|_| ServerError::Parse(format!("invalid gamepiece count in {p:?}"))),
        })
        .collect()
}
