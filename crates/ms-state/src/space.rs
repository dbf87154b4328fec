//! `StateSpace` — the hierarchical cell store.

use std::collections::BTreeMap;

use crate::{CellPath, StateError, StateResult, Value};

/// Sub-space holding one bundle per robot.
pub const ROBOTS: &str = "robots";
/// Sub-space holding one bundle per interactable object.
pub const INTERACTABLES: &str = "interactables";
/// Child space of a robot bundle: one `Int` cell per held piece kind.
pub const GAMEPIECES: &str = "gamepieces";

/// A node in the state tree: named value cells plus named child spaces.
///
/// `BTreeMap` keeps iteration order stable so snapshots, logs and output rows
/// come out identically across runs.
///
/// # Construction vs. mutation
///
/// The builder methods ([`with_value`][Self::with_value],
/// [`with_space`][Self::with_space]) assemble an initial snapshot before it is
/// registered.  Once a bundle lives inside a server-owned space the only
/// writer is [`ValueChange::apply`][crate::ValueChange::apply].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateSpace {
    values: BTreeMap<String, Value>,
    spaces: BTreeMap<String, StateSpace>,
}

impl StateSpace {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Snapshot builders ─────────────────────────────────────────────────

    /// Add or replace a cell.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add or replace a child space.
    pub fn with_space(mut self, name: impl Into<String>, space: StateSpace) -> Self {
        self.spaces.insert(name.into(), space);
        self
    }

    // ── Setup-time registration ───────────────────────────────────────────

    /// Create a new cell at this level.
    pub fn define(&mut self, key: impl Into<String>, value: impl Into<Value>) -> StateResult<()> {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(StateError::DuplicateCell(key));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Create an empty named sub-space.
    pub fn create_sub_space(&mut self, name: impl Into<String>) -> StateResult<()> {
        let name = name.into();
        if self.spaces.contains_key(&name) {
            return Err(StateError::DuplicateSpace(name));
        }
        self.spaces.insert(name, StateSpace::new());
        Ok(())
    }

    /// Register `entity` inside `sub_space` with its initial bundle.
    ///
    /// Fails with `NotFound` if the sub-space was never created and with
    /// `DuplicateEntity` if the name is taken.
    pub fn register(
        &mut self,
        sub_space: &str,
        entity:    impl Into<String>,
        initial:   StateSpace,
    ) -> StateResult<()> {
        let entity = entity.into();
        let space = self
            .spaces
            .get_mut(sub_space)
            .ok_or_else(|| StateError::not_found("sub-space", sub_space))?;
        if space.spaces.contains_key(&entity) {
            return Err(StateError::DuplicateEntity {
                sub_space: sub_space.to_owned(),
                entity,
            });
        }
        space.spaces.insert(entity, initial);
        Ok(())
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The bundle registered as `entity` in `sub_space`.
    pub fn get(&self, sub_space: &str, entity: &str) -> StateResult<&StateSpace> {
        let space = self
            .spaces
            .get(sub_space)
            .ok_or_else(|| StateError::not_found("sub-space", sub_space))?;
        space
            .spaces
            .get(entity)
            .ok_or_else(|| StateError::not_found("entity", format!("{sub_space}/{entity}")))
    }

    pub fn contains(&self, sub_space: &str, entity: &str) -> bool {
        self.get(sub_space, entity).is_ok()
    }

    /// Names registered in `sub_space`, in sorted order.
    pub fn entities(&self, sub_space: &str) -> StateResult<impl Iterator<Item = &str> + '_> {
        let space = self
            .spaces
            .get(sub_space)
            .ok_or_else(|| StateError::not_found("sub-space", sub_space))?;
        Ok(space.spaces.keys().map(String::as_str))
    }

    #[inline]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[inline]
    pub fn space(&self, name: &str) -> Option<&StateSpace> {
        self.spaces.get(name)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn spaces(&self) -> impl Iterator<Item = (&str, &StateSpace)> + '_ {
        self.spaces.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `true` if there are neither cells nor child spaces.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.spaces.is_empty()
    }

    /// Follow `path` through child spaces.
    pub fn descend(&self, path: &[String]) -> StateResult<&StateSpace> {
        let mut node = self;
        for (depth, name) in path.iter().enumerate() {
            node = node
                .spaces
                .get(name)
                .ok_or_else(|| StateError::not_found("space", path[..=depth].join("/")))?;
        }
        Ok(node)
    }

    fn descend_mut(&mut self, path: &[String]) -> StateResult<&mut StateSpace> {
        let mut node = self;
        for (depth, name) in path.iter().enumerate() {
            node = node
                .spaces
                .get_mut(name)
                .ok_or_else(|| StateError::not_found("space", path[..=depth].join("/")))?;
        }
        Ok(node)
    }

    /// Read the cell at `path`.
    pub fn cell(&self, path: &CellPath) -> StateResult<&Value> {
        self.descend(&path.spaces)?
            .values
            .get(&path.key)
            .ok_or_else(|| StateError::not_found("cell", path.to_string()))
    }

    pub(crate) fn cell_mut(&mut self, path: &CellPath) -> StateResult<&mut Value> {
        self.descend_mut(&path.spaces)?
            .values
            .get_mut(&path.key)
            .ok_or_else(|| StateError::not_found("cell", path.to_string()))
    }
}
