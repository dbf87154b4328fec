//! Per-agent busy-until table.
//!
//! An agent is free when `busy_until <= now`.  Freedom is computed on every
//! query; nothing fires when an action completes.

use ms_core::SimTime;

/// `busy_until` per agent, indexed by roster position.
#[derive(Clone, Debug, Default)]
pub struct BusyTable {
    until: Vec<SimTime>,
}

impl BusyTable {
    /// `count` agents, all free at `now`.
    pub fn new(count: usize, now: SimTime) -> Self {
        Self { until: vec![now; count] }
    }

    /// Mark every agent free at `now`.
    pub fn reset(&mut self, now: SimTime) {
        self.until.fill(now);
    }

    #[inline]
    pub fn is_free(&self, agent: usize, now: SimTime) -> bool {
        self.until.get(agent).is_some_and(|&t| t <= now)
    }

    pub fn busy_until(&self, agent: usize) -> Option<SimTime> {
        self.until.get(agent).copied()
    }

    pub fn set(&mut self, agent: usize, until: SimTime) {
        if let Some(slot) = self.until.get_mut(agent) {
            *slot = until;
        }
    }

    /// Indices of agents free at `now`.
    pub fn free_at(&self, now: SimTime) -> impl Iterator<Item = usize> + '_ {
        self.until
            .iter()
            .enumerate()
            .filter(move |&(_, &t)| t <= now)
            .map(|(i, _)| i)
    }

    /// Earliest completion strictly after `now`.
    pub fn next_event(&self, now: SimTime) -> Option<SimTime> {
        self.until.iter().copied().filter(|&t| t > now).min()
    }

    pub fn len(&self) -> usize {
        self.until.len()
    }

    pub fn is_empty(&self) -> bool {
        self.until.is_empty()
    }
}
