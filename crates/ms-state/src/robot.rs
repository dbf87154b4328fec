//! Robot snapshot and its cell layout inside the `robots` sub-space.

use std::collections::BTreeMap;

use ms_core::{Alliance, Pose};

use crate::space::GAMEPIECES;
use crate::{CellPath, StateError, StateResult, StateSpace, Value, ValueChange};

pub const TEAM: &str = "team";
pub const X: &str = "x";
pub const Y: &str = "y";
pub const HEADING: &str = "heading";

/// Plain-data view of one robot's bundle.
///
/// Used to seed the bundle at registration and to read it back for
/// policies, rewards and output rows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotState {
    pub name:       String,
    pub team:       Alliance,
    pub pose:       Pose,
    /// Held count per piece kind.
    pub gamepieces: BTreeMap<String, i64>,
}

impl RobotState {
    pub fn new(name: impl Into<String>, team: Alliance, pose: Pose) -> Self {
        Self {
            name: name.into(),
            team,
            pose,
            gamepieces: BTreeMap::new(),
        }
    }

    /// Declare a piece kind with an initial held count.
    pub fn with_gamepiece(mut self, kind: impl Into<String>, count: i64) -> Self {
        self.gamepieces.insert(kind.into(), count);
        self
    }

    pub fn held(&self, kind: &str) -> i64 {
        self.gamepieces.get(kind).copied().unwrap_or(0)
    }

    /// Build the bundle registered under `robots/<name>`.
    pub fn to_space(&self) -> StateSpace {
        let pieces = self
            .gamepieces
            .iter()
            .fold(StateSpace::new(), |s, (k, &n)| s.with_value(k.clone(), n));
        StateSpace::new()
            .with_value(TEAM, self.team.as_str())
            .with_value(X, self.pose.x)
            .with_value(Y, self.pose.y)
            .with_value(HEADING, self.pose.heading)
            .with_space(GAMEPIECES, pieces)
    }

    /// Read a bundle back into a snapshot.
    pub fn from_space(name: &str, space: &StateSpace) -> StateResult<Self> {
        let team = text(space, name, TEAM)?
            .parse::<Alliance>()
            .map_err(|_| StateError::TypeMismatch {
                cell:     CellPath::robot(name, TEAM).to_string(),
                expected: "alliance",
                got:      "text",
            })?;
        let pose = Pose {
            x:       float(space, name, X)?,
            y:       float(space, name, Y)?,
            heading: float(space, name, HEADING)?,
        };
        let gamepieces = match space.space(GAMEPIECES) {
            Some(p) => p
                .values()
                .filter_map(|(k, v)| v.as_int().map(|n| (k.to_owned(), n)))
                .collect(),
            None => BTreeMap::new(),
        };
        Ok(Self { name: name.to_owned(), team, pose, gamepieces })
    }

    /// Journal that moves `robot` to `pose`.
    pub fn pose_changes(robot: &str, pose: Pose) -> Vec<ValueChange> {
        vec![
            ValueChange::set(CellPath::robot(robot, X), pose.x),
            ValueChange::set(CellPath::robot(robot, Y), pose.y),
            ValueChange::set(CellPath::robot(robot, HEADING), pose.heading),
        ]
    }
}

fn float(space: &StateSpace, robot: &str, key: &str) -> StateResult<f64> {
    let v = space
        .value(key)
        .ok_or_else(|| StateError::not_found("cell", CellPath::robot(robot, key).to_string()))?;
    v.as_float().ok_or_else(|| StateError::TypeMismatch {
        cell:     CellPath::robot(robot, key).to_string(),
        expected: "float",
        got:      v.kind(),
    })
}

fn text<'a>(space: &'a StateSpace, robot: &str, key: &str) -> StateResult<&'a str> {
    match space.value(key) {
        Some(Value::Text(s)) => Ok(s),
        Some(other) => Err(StateError::TypeMismatch {
            cell:     CellPath::robot(robot, key).to_string(),
            expected: "text",
            got:      other.kind(),
        }),
        None => Err(StateError::not_found("cell", CellPath::robot(robot, key).to_string())),
    }
}
