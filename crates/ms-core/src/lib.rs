//! `ms-core` — foundational types for the `matchsim` engine.
//!
//! Every other `ms-*` crate depends on this one.  It has no `ms-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`time`]      | `SimTime`, `MatchTiming`, `MatchClock`, `MatchPhase`    |
//! | [`pose`]      | `Point`, `Pose`, angle normalisation                    |
//! | [`team`]      | `Alliance` enum                                         |
//! | [`rng`]       | `AgentRng` (per-agent deterministic RNG)                |
//! | [`context`]   | `EngineContext`, `Capabilities`                         |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod context;
pub mod error;
pub mod pose;
pub mod rng;
pub mod team;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use context::{Capabilities, EngineContext};
pub use error::{CoreError, CoreResult};
pub use pose::{normalize_angle, Point, Pose};
pub use rng::AgentRng;
pub use team::Alliance;
pub use time::{MatchClock, MatchPhase, MatchTiming, SimTime};
