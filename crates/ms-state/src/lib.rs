//! `ms-state` — the world state of a match.
//!
//! # Model
//!
//! A [`StateSpace`] is a tree.  Each node holds named value cells and named
//! child spaces.  The root holds global cells (`score`, `red_score`, …) and
//! the two entity sub-spaces:
//!
//! ```text
//! root
//! ├── score, red_score, blue_score          (global cells)
//! ├── robots/
//! │   └── <robot>/ team, x, y, heading
//! │       └── gamepieces/ <kind> …
//! └── interactables/
//!     └── <object>/ …                       (per-object cells)
//! ```
//!
//! Entities are registered once per sub-space and never deleted.  After
//! registration a cell only changes through a [`ValueChange`]: effects
//! produce journals, the server applies them with [`apply_journal`].
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`value`]  | `Value` (typed cell content)                          |
//! | [`space`]  | `StateSpace`, sub-space names                         |
//! | [`change`] | `CellPath`, `ValueChange`, `apply_journal`            |
//! | [`robot`]  | `RobotState` snapshot and its cell layout             |
//! | [`error`]  | `StateError`, `StateResult`                           |

pub mod change;
pub mod error;
pub mod robot;
pub mod space;
pub mod value;


pub use change::{apply_journal, CellPath, ValueChange};
pub use error::{StateError, StateResult};
pub use robot::RobotState;
pub use space::{StateSpace, GAMEPIECES, INTERACTABLES, ROBOTS};
pub use value::Value;
