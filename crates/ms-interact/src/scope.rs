//! Read-only inputs of an effect function.

use ms_core::{Alliance, SimTime};
use ms_state::space::GAMEPIECES;
use ms_state::{CellPath, StateSpace, Value};

use crate::{InteractError, InteractResult};

/// A registered entity: its location in the tree plus a borrow of its bundle.
#[derive(Clone, Copy, Debug)]
pub struct EntityRef<'a> {
    pub sub_space: &'a str,
    pub name:      &'a str,
    pub state:     &'a StateSpace,
}

impl<'a> EntityRef<'a> {
    /// Address of `key` inside this bundle, for building changes.
    pub fn cell(&self, key: &str) -> CellPath {
        CellPath::entity(self.sub_space, self.name, key)
    }

    /// Address of the held-count cell for piece `kind`.
    pub fn gamepiece_cell(&self, kind: &str) -> CellPath {
        CellPath::new(
            vec![self.sub_space.to_owned(), self.name.to_owned(), GAMEPIECES.to_owned()],
            kind,
        )
    }

    pub fn value(&self, key: &str) -> InteractResult<&'a Value> {
        self.state.value(key).ok_or_else(|| InteractError::NotFound {
            what: "cell",
            name: self.cell(key).to_string(),
        })
    }

    pub fn int(&self, key: &str) -> InteractResult<i64> {
        let v = self.value(key)?;
        v.as_int()
            .ok_or_else(|| InteractError::Fault(format!("{} is {}, not int", self.cell(key), v.kind())))
    }

    pub fn float(&self, key: &str) -> InteractResult<f64> {
        let v = self.value(key)?;
        v.as_float()
            .ok_or_else(|| InteractError::Fault(format!("{} is {}, not numeric", self.cell(key), v.kind())))
    }

    /// Held count of piece `kind`; `None` if the robot never declared it.
    pub fn held(&self, kind: &str) -> Option<i64> {
        self.state.space(GAMEPIECES)?.value(kind)?.as_int()
    }

    /// Alliance recorded in the `team` cell.
    pub fn alliance(&self) -> InteractResult<Alliance> {
        let v = self.value("team")?;
        v.as_text()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| InteractError::Fault(format!("{} has no valid team", self.name)))
    }
}

/// Everything an interaction may read while computing its journal.
#[derive(Clone, Copy, Debug)]
pub struct EffectScope<'a> {
    /// The robot performing the interaction.
    pub actor:  EntityRef<'a>,
    /// The interactable being acted on.
    pub target: EntityRef<'a>,
    /// The whole state tree, for global cells.
    pub global: &'a StateSpace,
    pub now:    SimTime,
}
