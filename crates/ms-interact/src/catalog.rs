//! Per-agent discrete action space.

use std::fmt;

pub const WAIT: &str = "WAIT";
pub const NO_OP: &str = "NO_OP";

/// An `(interactable, interaction)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionKey {
    pub interactable: String,
    pub interaction:  String,
}

impl ActionKey {
    pub fn new(interactable: impl Into<String>, interaction: impl Into<String>) -> Self {
        Self {
            interactable: interactable.into(),
            interaction:  interaction.into(),
        }
    }

    pub fn wait() -> Self {
        Self::new(WAIT, NO_OP)
    }

    pub fn is_wait(&self) -> bool {
        self.interactable == WAIT && self.interaction == NO_OP
    }

    /// Log label: `WAIT`, or `interactable:interaction`.
    pub fn label(&self) -> String {
        if self.is_wait() {
            WAIT.to_owned()
        } else {
            format!("{}:{}", self.interactable, self.interaction)
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Indexed action list.  Index 0 is always `("WAIT", "NO_OP")`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCatalog {
    entries: Vec<ActionKey>,
}

impl ActionCatalog {
    /// Build from the server's action set.  Any WAIT entry in `actions` is
    /// dropped so it appears only at index 0.
    pub fn new(actions: impl IntoIterator<Item = ActionKey>) -> Self {
        let mut entries = vec![ActionKey::wait()];
        entries.extend(actions.into_iter().filter(|a| !a.is_wait()));
        Self { entries }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ActionKey> {
        self.entries.get(index)
    }

    pub fn index_of(&self, key: &ActionKey) -> Option<usize> {
        self.entries.iter().position(|k| k == key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: WAIT is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionKey> + '_ {
        self.entries.iter()
    }
}
