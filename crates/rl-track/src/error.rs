//! Track error type.

use thiserror::Error;

use rl_core::{StationId, VehicleId};

/// Errors produced by `rl-track`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("station {station} is outside 1..={station_count}")]
    StationOutOfRange { station: StationId, station_count: u32 },

    #[error("{0} is not a vehicle on this track")]
    UnknownVehicle(VehicleId),

    #[error("station {station} is already occupied by {occupant}")]
    Occupied { station: StationId, occupant: VehicleId },

    #[error("{vehicle} is not at station {station}")]
    NotAt { vehicle: VehicleId, station: StationId },

    #[error("{0} is already placed on the track")]
    AlreadyPlaced(VehicleId),
}

pub type TrackResult<T> = Result<T, TrackError>;
