//! Fleet error type and its classification.

use thiserror::Error;

use rl_core::{CommandId, CoreError, StationId, VehicleId};
use rl_plan::{ConsistencyViolation, PlanError};
use rl_track::TrackError;

/// Broad class of a [`FleetError`], for mapping onto transport status codes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// Malformed input: bad station, unknown vehicle or command.
    Validation,
    /// Well-formed but clashes with current state.
    Conflict,
    /// Operation needs `initialize` first.
    Uninitialized,
    /// Internal invariant breach.  Never retried.
    Consistency,
    /// Invalid `LoopConfig`.
    Config,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("system is not initialized")]
    Uninitialized,

    #[error("system is already initialized; reset first")]
    AlreadyInitialized,

    #[error("{0} is not a known vehicle")]
    UnknownVehicle(VehicleId),

    #[error("vehicle name {0:?} is not known")]
    UnknownVehicleName(String),

    #[error("{command_id} was never issued (reported by {vehicle})")]
    UnknownCommand { vehicle: VehicleId, command_id: CommandId },

    #[error("station {station} is outside 1..={station_count}")]
    StationOutOfRange { station: StationId, station_count: u32 },

    #[error("invalid initial positions: {0}")]
    InvalidPositions(String),

    #[error("{vehicle} already has a pending call to {target}")]
    DuplicateCall { vehicle: VehicleId, target: StationId },

    #[error("station {station} is occupied by {occupant}")]
    StationOccupied { station: StationId, occupant: VehicleId },

    #[error("station {station} is the destination of {heading}'s outstanding command")]
    StationReserved { station: StationId, heading: VehicleId },

    #[error("consistency violation: {0}")]
    Consistency(#[from] ConsistencyViolation),

    #[error("internal state error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl FleetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FleetError::Uninitialized => ErrorKind::Uninitialized,
            FleetError::UnknownVehicle(_)
            | FleetError::UnknownVehicleName(_)
            | FleetError::UnknownCommand { .. }
            | FleetError::StationOutOfRange { .. }
            | FleetError::InvalidPositions(_) => ErrorKind::Validation,
            FleetError::AlreadyInitialized
            | FleetError::DuplicateCall { .. }
            | FleetError::StationOccupied { .. }
            | FleetError::StationReserved { .. } => ErrorKind::Conflict,
            FleetError::Consistency(_) | FleetError::Internal(_) => ErrorKind::Consistency,
            FleetError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<CoreError> for FleetError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(msg)             => FleetError::Config(msg),
            CoreError::UnknownVehicleName(name) => FleetError::UnknownVehicleName(name),
        }
    }
}

impl From<TrackError> for FleetError {
    fn from(e: TrackError) -> Self {
        match e {
            TrackError::StationOutOfRange { station, station_count } => {
                FleetError::StationOutOfRange { station, station_count }
            }
            TrackError::UnknownVehicle(v) => FleetError::UnknownVehicle(v),
            TrackError::Occupied { station, occupant } => {
                FleetError::StationOccupied { station, occupant }
            }
            other @ (TrackError::NotAt { .. } | TrackError::AlreadyPlaced(_)) => {
                FleetError::Internal(other.to_string())
            }
        }
    }
}

impl From<PlanError> for FleetError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::DuplicateCall { vehicle, target } => {
                FleetError::DuplicateCall { vehicle, target }
            }
            PlanError::Consistency(c) => FleetError::Consistency(c),
            PlanError::Track(t)       => t.into(),
            other @ PlanError::NotPlaced(_) => FleetError::Internal(other.to_string()),
        }
    }
}

pub type FleetResult<T> = Result<T, FleetError>;
