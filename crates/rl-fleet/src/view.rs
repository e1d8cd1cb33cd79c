//! Read-only projections.
//!
//! Every view is an owned copy so it can outlive the lock it was built under.

use rl_core::{CommandId, StationId, VehicleId, VehicleStatus};
use rl_plan::PreviewStep;

/// Liveness probe.  Valid whether or not the fleet is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Health {
    pub healthy:     bool,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VehicleView {
    pub vehicle:      VehicleId,
    pub name:         String,
    pub station:      Option<StationId>,
    pub status:       VehicleStatus,
    /// Latest command id issued to the vehicle, `0` if none.
    pub command_id:   CommandId,
    /// Call target, if the vehicle has a pending call.
    pub target:       Option<StationId>,
    /// Destination of the outstanding command while moving.
    pub next_station: Option<StationId>,
    /// Stations still to traverse to reach `target`.
    pub sequence:     Vec<StationId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StationView {
    pub station:     StationId,
    pub occupied_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CallView {
    pub vehicle:        VehicleId,
    pub name:           String,
    pub target_station: StationId,
}

/// Full debug summary of the fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusView {
    pub initialized:     bool,
    pub vehicles:        Vec<VehicleView>,
    pub stations:        Vec<StationView>,
    pub pending_calls:   Vec<CallView>,
    pub next_command_id: CommandId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PositionView {
    pub vehicle: VehicleId,
    pub name:    String,
    pub station: StationId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SequenceView {
    pub vehicle:  VehicleId,
    pub name:     String,
    pub sequence: Vec<StationId>,
}

/// Everything a management UI shows, plus a simulated movement plan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DashboardView {
    pub initialized:   bool,
    pub vehicles:      Vec<VehicleView>,
    pub stations:      Vec<StationView>,
    pub pending_calls: Vec<CallView>,
    pub movement_plan: Vec<PreviewStep>,
}
