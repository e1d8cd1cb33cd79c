//! `rl-plan` — pending calls and the movement planner.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`calls`]    | `CallQueue`, `Call`, `SubmitOutcome` — FIFO, one per vehicle  |
//! | [`context`]  | `PlanContext<'a>`, `InFlight` — read-only planner snapshot    |
//! | [`hop`]      | `Hop`, `Chain` — planned single-station moves                 |
//! | [`planner`]  | `blocking_chain`, `plan_pass`                                 |
//! | [`preview`]  | `preview`, `sequences` — non-committing simulations           |
//! | [`error`]    | `PlanError`, `ConsistencyViolation`, `PlanResult<T>`          |
//!
//! # Planning model
//!
//! Occupancy only changes when a device confirms an arrival, so a planning
//! pass never assumes a proposed hop has happened.  For a vehicle whose next
//! station is blocked, the planner walks forward over the occupants until it
//! finds a free station and builds the chain of hops that would clear the
//! way, innermost first:
//!
//! ```text
//! stations:   1    2    3    4
//!             a    b    c    ·      a wants to advance
//! chain:      c 3→4, b 2→3, a 1→2
//! dispatched: c 3→4                 (the only hop into a really free station)
//! ```
//!
//! The outer hops are dispatched by later passes as reports come in.

pub mod calls;
pub mod context;
pub mod error;
pub mod hop;
pub mod planner;
pub mod preview;


pub use calls::{Call, CallQueue, SubmitOutcome};
pub use context::{InFlight, PlanContext};
pub use error::{ConsistencyViolation, PlanError, PlanResult};
pub use hop::{Chain, Hop};
pub use planner::{blocking_chain, plan_pass};
pub use preview::{PreviewStep, preview, sequences};
