//! `ms-server` — one match, end to end.
//!
//! A [`Game`] describes the field, its interactables, the match timing and
//! the time-driven rules.  A [`GameServer`] owns the mutable state of one
//! match built from it and executes actions:
//!
//! ```text
//! dispatch(interactable, interaction, robot, traffic):
//!   ① resolve       — unknown names come back as success = false
//!   ② plan          — cache lookup, else find_path + generate_trajectory
//!                     against the other robots' in-flight trajectories
//!   ③ drive         — pose journal applied, Drive receipt logged
//!   ④ interact      — effect evaluated at the destination; its journal is
//!                     applied in order and logged
//! ```
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`game`]   | `Game` (static definition, shared behind `Arc`)           |
//! | [`server`] | `GameServer`, `ServerConfig`, `DriveOutcome`              |
//! | [`rules`]  | `MatchRule` trait, `ParkingBonus`                         |
//! | [`log`]    | `MatchLog`, `Receipt`                                     |
//! | [`cache`]  | `TrajectoryCache`                                         |
//! | [`pool`]   | `ServerPool`, `ServerTemplate`, `PoolStats`               |
//! | [`roster`] | CSV roster loader                                         |

pub mod cache;
pub mod error;
pub mod game;
pub mod log;
pub mod pool;
pub mod roster;
pub mod rules;
pub mod server;


pub use cache::{CacheStats, TrajectoryCache};
pub use error::{ServerError, ServerResult};
pub use game::Game;
pub use log::{MatchLog, Receipt, ReceiptKind};
pub use pool::{PoolStats, ServerPool, ServerTemplate};
pub use roster::{load_roster, load_roster_reader, RosterEntry};
pub use rules::{MatchRule, ParkingBonus};
pub use server::{ActionFailure, DriveOutcome, GameServer, ServerConfig, SCORE_CELLS};
