//! Change journal: deferred, single-cell mutations.

use std::fmt;

use crate::space::{GAMEPIECES, INTERACTABLES, ROBOTS};
use crate::{StateError, StateResult, StateSpace, Value};

// ── CellPath ──────────────────────────────────────────────────────────────────

/// Address of one value cell: the chain of child spaces, then the cell key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPath {
    pub spaces: Vec<String>,
    pub key:    String,
}

impl CellPath {
    pub fn new(spaces: Vec<String>, key: impl Into<String>) -> Self {
        Self { spaces, key: key.into() }
    }

    /// A cell at the root of the state tree.
    pub fn global(key: impl Into<String>) -> Self {
        Self { spaces: Vec::new(), key: key.into() }
    }

    /// A cell inside an entity bundle.
    pub fn entity(sub_space: &str, entity: &str, key: impl Into<String>) -> Self {
        Self {
            spaces: vec![sub_space.to_owned(), entity.to_owned()],
            key:    key.into(),
        }
    }

    pub fn robot(robot: &str, key: impl Into<String>) -> Self {
        Self::entity(ROBOTS, robot, key)
    }

    pub fn interactable(name: &str, key: impl Into<String>) -> Self {
        Self::entity(INTERACTABLES, name, key)
    }

    /// The held-count cell for piece `kind` on `robot`.
    pub fn gamepiece(robot: &str, kind: impl Into<String>) -> Self {
        Self {
            spaces: vec![ROBOTS.to_owned(), robot.to_owned(), GAMEPIECES.to_owned()],
            key:    kind.into(),
        }
    }
}

impl fmt::Display for CellPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.spaces {
            write!(f, "{s}/")?;
        }
        f.write_str(&self.key)
    }
}

// ── ValueChange ───────────────────────────────────────────────────────────────

/// One pending mutation bound to one cell.
///
/// Applying is **not** idempotent: two `apply` calls on an `Increase` add
/// twice.  Journals are applied once, in order, immediately after the effect
/// that produced them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueChange {
    /// Replace the cell's value.  The variant must match.
    Set { cell: CellPath, value: Value },
    /// Add a numeric delta.
    Increase { cell: CellPath, by: Value },
    /// Subtract a numeric delta.
    Decrease { cell: CellPath, by: Value },
}

impl ValueChange {
    pub fn set(cell: CellPath, value: impl Into<Value>) -> Self {
        ValueChange::Set { cell, value: value.into() }
    }

    pub fn increase(cell: CellPath, by: impl Into<Value>) -> Self {
        ValueChange::Increase { cell, by: by.into() }
    }

    pub fn decrease(cell: CellPath, by: impl Into<Value>) -> Self {
        ValueChange::Decrease { cell, by: by.into() }
    }

    pub fn cell(&self) -> &CellPath {
        match self {
            ValueChange::Set { cell, .. }
            | ValueChange::Increase { cell, .. }
            | ValueChange::Decrease { cell, .. } => cell,
        }
    }

    /// The value or delta carried by this change.
    pub fn requested(&self) -> &Value {
        match self {
            ValueChange::Set { value, .. } => value,
            ValueChange::Increase { by, .. } | ValueChange::Decrease { by, .. } => by,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ValueChange::Set { .. }      => "set",
            ValueChange::Increase { .. } => "increase",
            ValueChange::Decrease { .. } => "decrease",
        }
    }

    /// Mutate the target cell and return its new value.
    ///
    /// On error the cell is left untouched.
    pub fn apply(&self, space: &mut StateSpace) -> StateResult<Value> {
        let slot = space.cell_mut(self.cell())?;
        let next = match self {
            ValueChange::Set { cell, value } => {
                if !slot.same_kind(value) {
                    return Err(StateError::TypeMismatch {
                        cell:     cell.to_string(),
                        expected: slot.kind(),
                        got:      value.kind(),
                    });
                }
                value.clone()
            }
            ValueChange::Increase { cell, by } | ValueChange::Decrease { cell, by } => {
                let negate = matches!(self, ValueChange::Decrease { .. });
                if !slot.is_numeric() {
                    return Err(StateError::NotNumeric {
                        cell: cell.to_string(),
                        kind: slot.kind(),
                    });
                }
                slot.offset(by, negate).ok_or_else(|| StateError::TypeMismatch {
                    cell:     cell.to_string(),
                    expected: slot.kind(),
                    got:      by.kind(),
                })?
            }
        };
        *slot = next.clone();
        Ok(next)
    }
}

impl fmt::Display for ValueChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.verb(), self.cell(), self.requested())
    }
}

// ── Journal application ───────────────────────────────────────────────────────

/// Apply `changes` in order.
///
/// Stops at the first failing change and returns
/// [`StateError::PartialJournal`] carrying how many changes were already
/// applied.  Those are **not** rolled back.
pub fn apply_journal(space: &mut StateSpace, changes: &[ValueChange]) -> StateResult<usize> {
    for (applied, change) in changes.iter().enumerate() {
        if let Err(e) = change.apply(space) {
            return Err(StateError::PartialJournal {
                applied,
                total:  changes.len(),
                source: Box::new(e),
            });
        }
    }
    Ok(changes.len())
}
