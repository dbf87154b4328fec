//! Deterministic per-agent RNG.
//!
//! Each agent gets its own `SmallRng` seeded by:
//!
//!   seed = global_seed XOR ((roster_index + 1) * GOLDEN)
//!
//! The `+ 1` keeps agent 0 off the bare global seed.  Appending a robot to
//! the roster leaves every earlier robot's stream unchanged.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG used by policies.
#[derive(Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed from the run's global seed and the agent's roster index.
    pub fn new(global_seed: u64, index: usize) -> Self {
        let seed = global_seed ^ (index as u64).wrapping_add(1).wrapping_mul(GOLDEN);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
