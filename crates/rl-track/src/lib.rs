//! `rl-track` — the circular occupancy map.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`track`]  | `Track` — station occupants + vehicle positions          |
//! | [`error`]  | `TrackError`, `TrackResult<T>`                          |
//!
//! # Geometry
//!
//! Stations are numbered `1..=N` and vehicles only move forward:
//!
//! ```text
//! successor(s) = (s mod N) + 1        // N wraps to 1
//! distance(a, b) = forward hops from a to b, 0 when a == b
//! ```
//!
//! `Track` stores occupancy in both directions (station → vehicle and
//! vehicle → station) and every mutation updates both together, so the two
//! views can never disagree.

pub mod error;
pub mod track;


pub use error::{TrackError, TrackResult};
pub use track::Track;
