//! Bounded pool of ready-to-use game servers.
//!
//! Building a server means validating the game and registering every
//! robot, and its traversal maps and trajectory cache warm up over the
//! first episode.  The pool keeps up to `max_size` idle servers so parallel
//! rollouts can reuse them.
//!
//! A server is handed out by value, so no two holders can share one.
//! [`ServerPool::acquire`] never blocks on capacity: when nothing is idle it
//! builds a fresh server.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use ms_core::EngineContext;
use ms_motion::MotionPlanner;

use crate::{Game, GameServer, RosterEntry, ServerConfig, ServerResult};

/// Pool counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Servers currently waiting in the pool.
    pub idle:     usize,
    pub max_size: usize,
    /// Servers built since the pool was created.
    pub created:  u64,
    pub acquired: u64,
    pub released: u64,
}

struct PoolInner<P: MotionPlanner> {
    idle:     Vec<GameServer<P>>,
    created:  u64,
    acquired: u64,
    released: u64,
}

/// Everything needed to build an identical server on demand.
#[derive(Clone)]
pub struct ServerTemplate<P> {
    pub game:    Arc<Game>,
    pub planner: P,
    pub config:  ServerConfig,
    pub ctx:     EngineContext,
    pub roster:  Vec<RosterEntry>,
}

impl<P: MotionPlanner + Clone> ServerTemplate<P> {
    pub fn build(&self) -> ServerResult<GameServer<P>> {
        let mut server = GameServer::load_from_game(
            Arc::clone(&self.game),
            self.planner.clone(),
            self.config.clone(),
            self.ctx.clone(),
        )?;
        for entry in &self.roster {
            entry.register(&mut server)?;
        }
        Ok(server)
    }
}

pub struct ServerPool<P: MotionPlanner + Clone> {
    template: ServerTemplate<P>,
    max_size: usize,
    inner:    Mutex<PoolInner<P>>,
}

impl<P: MotionPlanner + Clone> ServerPool<P> {
    pub fn new(template: ServerTemplate<P>, max_size: usize) -> Self {
        Self {
            template,
            max_size,
            inner: Mutex::new(PoolInner {
                idle:     Vec::with_capacity(max_size),
                created:  0,
                acquired: 0,
                released: 0,
            }),
        }
    }

    /// Take an idle server (soft-reset) or build a new one.
    pub fn acquire(&self) -> ServerResult<GameServer<P>> {
        let reused = {
            let mut inner = self.lock();
            let server = inner.idle.pop();
            if server.is_some() {
                inner.acquired += 1;
            }
            server
        };
        if let Some(mut server) = reused {
            server.soft_reset();
            return Ok(server);
        }

        // Build outside the lock; other threads keep acquiring meanwhile.
        let server = self.template.build()?;
        let mut inner = self.lock();
        inner.created += 1;
        inner.acquired += 1;
        debug!(created = inner.created, "pool built a new server");
        Ok(server)
    }

    /// Return a server.  Dropped if the pool is already full.
    pub fn release(&self, server: GameServer<P>) {
        let mut inner = self.lock();
        inner.released += 1;
        if inner.idle.len() < self.max_size {
            inner.idle.push(server);
        }
    }

    pub fn get_stats(&self) -> PoolStats {
        let inner = self.lock();
        PoolStats {
            idle:     inner.idle.len(),
            max_size: self.max_size,
            created:  inner.created,
            acquired: inner.acquired,
            released: inner.released,
        }
    }

    /// Drop every idle server.  Counters are kept.
    pub fn clear(&self) {
        self.lock().idle.clear();
    }

    pub fn template(&self) -> &ServerTemplate<P> {
        &self.template
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner<P>> {
        // A panicking holder cannot leave the inner vectors half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
