//! `ms-sched` — SMDP scheduler for the matchsim engine.
//!
//! Agents commit to actions of different, data-dependent durations.  Control
//! returns to an agent only once its action has completed, and the clock
//! jumps straight to the next completion.
//!
//! # Step
//!
//! ```text
//! now = server clock
//!   ① Free set   — agents with busy_until <= now
//!   ② Dispatch   — in submission order, for each free agent:
//!                    WAIT             → busy_until = now + quantum
//!                    bad index        → INVALID, busy_until = now + quantum
//!                    (obj, action)    → server.dispatch at `now`;
//!                                       register trajectory (start = now,
//!                                       radius = footprint) before the
//!                                       next agent plans;
//!                                       busy_until = now + elapsed
//!                    server error     → invalid, busy_until = now + quantum
//!                  busy agents are reported as BUSY and left untouched;
//!                  a free agent with no submission waits
//!   ③ Advance    — server clock to min(busy_until) (event stepping) or by
//!                  one quantum
//!   ④ Report     — per-agent validity, label, free flag, trajectory,
//!                  reward; terminated = match over, truncated = step limit
//! ```
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`config`]    | `SchedulerConfig`                                       |
//! | [`busy`]      | `BusyTable`                                             |
//! | [`scheduler`] | `Scheduler`, `StepOutcome`, `EpisodeSummary`            |
//! | [`builder`]   | `SchedulerBuilder`                                      |
//! | [`reward`]    | `RewardModel`, `ScoreDelta`, `AllianceDifferential`     |
//! | [`policy`]    | `Policy`, `WaitPolicy`, `RandomPolicy`                  |
//! | [`observer`]  | `MatchObserver`, `NoopObserver`                         |

pub mod builder;
pub mod busy;
pub mod config;
pub mod error;
pub mod observer;
pub mod policy;
pub mod reward;
pub mod scheduler;


pub use builder::SchedulerBuilder;
pub use busy::BusyTable;
pub use config::SchedulerConfig;
pub use error::{SchedError, SchedResult};
pub use observer::{MatchObserver, NoopObserver};
pub use policy::{Policy, RandomPolicy, WaitPolicy};
pub use reward::{AllianceDifferential, RewardInput, RewardModel, ScoreBoard, ScoreDelta};
pub use scheduler::{AgentReturn, AgentStepInfo, EpisodeSummary, Scheduler, StepOutcome, BUSY, INVALID};
