//! Interactables and the per-game capability table.

use std::collections::BTreeMap;
use std::sync::Arc;

use ms_core::Pose;
use ms_state::StateSpace;

use crate::{ActionKey, InteractError, InteractResult, Interaction};

// ── Interactable ──────────────────────────────────────────────────────────────

/// A named object robots can act on.
#[derive(Clone)]
pub struct Interactable {
    pub name:             String,
    /// Default pose a robot drives to before interacting.
    pub navigation_point: Pose,
    /// Bundle registered under `interactables/<name>` at game load.
    pub initial_state:    StateSpace,
    interactions:         BTreeMap<String, Arc<dyn Interaction>>,
}

impl Interactable {
    pub fn new(name: impl Into<String>, navigation_point: Pose) -> Self {
        Self {
            name: name.into(),
            navigation_point,
            initial_state: StateSpace::new(),
            interactions: BTreeMap::new(),
        }
    }

    pub fn with_state(mut self, state: StateSpace) -> Self {
        self.initial_state = state;
        self
    }

    /// Add a named interaction.  Names are unique per interactable.
    pub fn with_interaction(
        mut self,
        name:        impl Into<String>,
        interaction: impl Interaction,
    ) -> InteractResult<Self> {
        let name = name.into();
        if self.interactions.contains_key(&name) {
            return Err(InteractError::Duplicate {
                what: "interaction",
                name: format!("{}:{name}", self.name),
            });
        }
        self.interactions.insert(name, Arc::new(interaction));
        Ok(self)
    }

    pub fn interaction(&self, name: &str) -> Option<&Arc<dyn Interaction>> {
        self.interactions.get(name)
    }

    pub fn interaction_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.interactions.keys().map(String::as_str)
    }

    /// Pose to drive to for `interaction`: its own override, else ours.
    pub fn navigation_for(&self, interaction: &dyn Interaction) -> Pose {
        interaction.navigation_point().unwrap_or(self.navigation_point)
    }
}

impl std::fmt::Debug for Interactable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactable")
            .field("name", &self.name)
            .field("navigation_point", &self.navigation_point)
            .field("interactions", &self.interactions.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ── InteractionRegistry ───────────────────────────────────────────────────────

/// Every interactable of one game, keyed by name.
///
/// Read-only once the game is loaded; servers share it behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct InteractionRegistry {
    interactables: BTreeMap<String, Interactable>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, interactable: Interactable) -> InteractResult<()> {
        if self.interactables.contains_key(&interactable.name) {
            return Err(InteractError::Duplicate {
                what: "interactable",
                name: interactable.name,
            });
        }
        self.interactables.insert(interactable.name.clone(), interactable);
        Ok(())
    }

    pub fn get(&self, name: &str) -> InteractResult<&Interactable> {
        self.interactables.get(name).ok_or_else(|| InteractError::NotFound {
            what: "interactable",
            name: name.to_owned(),
        })
    }

    /// Look up an (interactable, interaction) pair.
    pub fn resolve(
        &self,
        interactable: &str,
        interaction:  &str,
    ) -> InteractResult<(&Interactable, &Arc<dyn Interaction>)> {
        let obj = self.get(interactable)?;
        let action = obj.interaction(interaction).ok_or_else(|| InteractError::NotFound {
            what: "interaction",
            name: format!("{interactable}:{interaction}"),
        })?;
        Ok((obj, action))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interactable> + '_ {
        self.interactables.values()
    }

    pub fn len(&self) -> usize {
        self.interactables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactables.is_empty()
    }

    /// Every (interactable, interaction) pair, feasibility aside.
    pub fn action_keys(&self) -> Vec<ActionKey> {
        self.interactables
            .values()
            .flat_map(|obj| {
                obj.interaction_names()
                    .map(move |i| ActionKey::new(obj.name.as_str(), i))
            })
            .collect()
    }
}
