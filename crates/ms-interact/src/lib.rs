//! `ms-interact` — what robots can do to the field.
//!
//! An [`Interactable`] is a named object on the field (a loading station, a
//! goal) with a navigation point, an initial state bundle and a table of named
//! [`Interaction`]s.  The table is filled when the object is built and never
//! changes afterwards; dispatch is a map lookup, not a type test.
//!
//! Each interaction reads an [`EffectScope`] (actor bundle, target bundle,
//! global cells, match time) and returns a journal of
//! [`ValueChange`][ms_state::ValueChange]s.  It never writes state itself.
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`interaction`]| `Interaction` trait, `FnInteraction`                  |
//! | [`scope`]      | `EffectScope`, `EntityRef`                            |
//! | [`registry`]   | `Interactable`, `InteractionRegistry`                 |
//! | [`catalog`]    | `ActionKey`, `ActionCatalog` (WAIT at index 0)        |
//! | [`stations`]   | Built-in pickup station and scoring goal              |

pub mod catalog;
pub mod error;
pub mod interaction;
pub mod registry;
pub mod scope;
pub mod stations;

#[cfg(test)]
mod tests;

pub use catalog::{ActionCatalog, ActionKey, NO_OP, WAIT};
pub use error::{InteractError, InteractResult};
pub use interaction::{FnInteraction, Interaction};
pub use registry::{Interactable, InteractionRegistry};
pub use scope::{EffectScope, EntityRef};
