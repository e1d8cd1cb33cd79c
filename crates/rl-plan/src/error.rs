//! Planner error types.

use thiserror::Error;

use rl_core::{StationId, VehicleId};
use rl_track::TrackError;

/// The track is in a state the planner's structural guarantee rules out.
///
/// Never retried and never corrected; callers surface it as an internal bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyViolation {
    #[error("no free station within {probed} stations ahead of {vehicle} at {from}")]
    NoFreeStation {
        vehicle: VehicleId,
        from:    StationId,
        probed:  usize,
    },

    #[error("a loop of {stations} stations leaves no free station for {vehicles} vehicles")]
    FullLoop {
        stations: u32,
        vehicles: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("{vehicle} already has a pending call to {target}")]
    DuplicateCall { vehicle: VehicleId, target: StationId },

    #[error("{0} has not been placed on the track")]
    NotPlaced(VehicleId),

    #[error("consistency violation: {0}")]
    Consistency(#[from] ConsistencyViolation),

    #[error("track error: {0}")]
    Track(#[from] TrackError),
}

pub type PlanResult<T> = Result<T, PlanError>;
