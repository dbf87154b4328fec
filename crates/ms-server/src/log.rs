//! In-memory match log.

use std::fmt;

use ms_core::SimTime;
use ms_state::ValueChange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReceiptKind {
    Drive,
    Interaction,
    Rule,
    Failure,
}

impl ReceiptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReceiptKind::Drive       => "drive",
            ReceiptKind::Interaction => "interaction",
            ReceiptKind::Rule        => "rule",
            ReceiptKind::Failure     => "failure",
        }
    }
}

impl fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the match log.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub time:        SimTime,
    pub kind:        ReceiptKind,
    /// Acting robot; `None` for rules.
    pub robot:       Option<String>,
    pub description: String,
    /// Changes actually applied for this entry.
    pub changes:     Vec<ValueChange>,
}

#[derive(Clone, Debug, Default)]
pub struct MatchLog {
    entries: Vec<Receipt>,
}

impl MatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, receipt: Receipt) {
        self.entries.push(receipt);
    }

    pub fn entries(&self) -> &[Receipt] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Receipt> + '_ {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: ReceiptKind) -> impl Iterator<Item = &Receipt> + '_ {
        self.entries.iter().filter(move |r| r.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
