//! `rl-core` — foundational types for the `ringline` fleet controller.
//!
//! This crate is a dependency of every other `rl-*` crate.  It has no `rl-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `VehicleId`, `StationId`, `CommandId`                     |
//! | [`action`]   | `Action`, `VehicleStatus`, `MoveReason`, `ReportEvent`    |
//! | [`config`]   | `LoopConfig`                                              |
//! | [`error`]    | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod action;
pub mod config;
pub mod error;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::{Action, MoveReason, ReportEvent, VehicleStatus};
pub use config::LoopConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{CommandId, StationId, VehicleId};
