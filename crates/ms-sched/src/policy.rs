//! Action-selection policies used by [`Scheduler::run_episode`][crate::Scheduler::run_episode].

use ms_core::AgentRng;
use ms_interact::ActionCatalog;
use ms_state::StateSpace;

/// Picks a catalog index for each free agent.
///
/// Only [`choose`][Self::choose] is required.  `reset` is called once per
/// episode with the roster (in registration order) and the episode seed.
pub trait Policy {
    fn reset(&mut self, _agents: &[String], _seed: u64) {}

    fn choose(
        &mut self,
        agent:   usize,
        name:    &str,
        catalog: &ActionCatalog,
        state:   &StateSpace,
    ) -> usize;
}

/// Always WAIT.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitPolicy;

impl Policy for WaitPolicy {
    fn choose(&mut self, _agent: usize, _name: &str, _catalog: &ActionCatalog, _state: &StateSpace) -> usize {
        0
    }
}

/// Uniform over the catalog, one deterministic stream per agent.
#[derive(Debug, Default)]
pub struct RandomPolicy {
    rngs: Vec<AgentRng>,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for RandomPolicy {
    fn reset(&mut self, agents: &[String], seed: u64) {
        self.rngs = (0..agents.len()).map(|i| AgentRng::new(seed, i)).collect();
    }

    fn choose(&mut self, agent: usize, _name: &str, catalog: &ActionCatalog, _state: &StateSpace) -> usize {
        match self.rngs.get_mut(agent) {
            Some(rng) if catalog.len() > 1 => rng.gen_range(0..catalog.len()),
            _ => 0,
        }
    }
}
