//! `rl-fleet` — the owned fleet state and its request operations.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`fleet`]     | `Fleet<O>` — initialize / call / command / report / reset      |
//! | [`dispatch`]  | `Dispatcher`, `Command`, `CommandTicket` — monotonic commands  |
//! | [`report`]    | `Report`, `ReportOutcome`, `confirm_station`                   |
//! | [`view`]      | Read projections: status, positions, sequences, dashboard      |
//! | [`observer`]  | `FleetObserver` hooks, `LogObserver`, `NoopObserver`           |
//! | [`shared`]    | `SharedFleet<O>` — `RwLock` wrapper for concurrent handlers    |
//! | [`error`]     | `FleetError`, `ErrorKind`, `FleetResult<T>`                    |
//!
//! # Request cycle
//!
//! ```text
//! call(v, t)      → CallQueue → plan_pass → Dispatcher::issue   (v' moving)
//! command(v')     → latest command, unchanged until the next decision
//! report(v', …)   → confirm station → Track::move_vehicle → resolve call
//!                 → plan_pass → Dispatcher::issue …
//! ```
//!
//! Every mutating operation takes `&mut Fleet`, so one request's
//! read → plan → mutate sequence can never interleave with another's.
//! [`SharedFleet`] maps that onto a write lock per request.

pub mod dispatch;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod report;
pub mod shared;
pub mod view;

#[cfg(test)]
mod tests;

pub use dispatch::{Command, CommandTicket, Dispatcher};
pub use error::{ErrorKind, FleetError, FleetResult};
pub use fleet::{CallOutcome, Fleet};
pub use observer::{FleetObserver, LogObserver, NoopObserver};
pub use report::{Confirmation, Divergence, Report, ReportOutcome, confirm_station};
pub use shared::SharedFleet;
pub use view::{
    CallView, DashboardView, Health, PositionView, SequenceView, StationView, StatusView,
    VehicleView,
};
