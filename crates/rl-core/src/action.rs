//! Small closed enums shared by the planner, dispatcher, and projections.

use std::fmt;

use crate::StationId;

// ── Action ────────────────────────────────────────────────────────────────────

/// What a polling device is told to do.
///
/// `Forward` carries the station the server expects the device to stop at;
/// `Stop` carries nothing (the device stays where it is).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum Action {
    /// Advance one station and stop at `expected`.
    Forward { expected: StationId },
    /// Hold position.
    Stop,
}

impl Action {
    #[inline]
    pub fn is_forward(self) -> bool {
        matches!(self, Action::Forward { .. })
    }

    /// The expected station of a `Forward`, `None` for `Stop`.
    #[inline]
    pub fn expected(self) -> Option<StationId> {
        match self {
            Action::Forward { expected } => Some(expected),
            Action::Stop                 => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward { .. } => "forward",
            Action::Stop           => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Forward { expected } => write!(f, "forward→{expected}"),
            Action::Stop                 => f.write_str("stop"),
        }
    }
}

// ── VehicleStatus ─────────────────────────────────────────────────────────────

/// Per-vehicle state in the command protocol.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleStatus {
    /// No outstanding command; eligible for planning.
    #[default]
    Idle,
    /// A forward command is outstanding and not yet confirmed by a report.
    Moving,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Idle   => "idle",
            VehicleStatus::Moving => "moving",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MoveReason ────────────────────────────────────────────────────────────────

/// Why the planner moved a vehicle.  Observability only; it never affects
/// scheduling order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveReason {
    /// The vehicle has its own pending call and this hop advances it.
    MovingToTarget,
    /// The vehicle has no call and is vacating a station someone else needs.
    MakingSpace,
}

impl MoveReason {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveReason::MovingToTarget => "moving_to_target",
            MoveReason::MakingSpace    => "making_space",
        }
    }
}

impl fmt::Display for MoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ReportEvent ───────────────────────────────────────────────────────────────

/// Event kind carried by a device report.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReportEvent {
    /// The device stopped at a station after executing a forward command.
    #[default]
    Arrived,
    /// The device aborted the command without leaving its station.
    Error,
}

impl ReportEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportEvent::Arrived => "arrived",
            ReportEvent::Error   => "error",
        }
    }
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
