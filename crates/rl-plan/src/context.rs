//! Read-only fleet snapshot handed to the planner.

use rl_core::{MoveReason, StationId, VehicleId};
use rl_track::Track;

use crate::CallQueue;

/// An outstanding forward command, as the planner sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    /// Station the vehicle is heading to; reserved until confirmed.
    pub to:     StationId,
    /// Reason the command was issued with.
    pub reason: MoveReason,
}

impl InFlight {
    #[inline]
    pub fn new(to: StationId, reason: MoveReason) -> Self {
        Self { to, reason }
    }
}

/// Everything one planning pass may look at.
///
/// Built by the fleet for each pass and never mutated while the pass runs.
/// Proposed hops come back as values; applying them is the caller's job.
#[derive(Clone, Copy)]
pub struct PlanContext<'a> {
    /// Confirmed occupancy.
    pub track: &'a Track,

    /// Pending calls in submission order.
    pub calls: &'a CallQueue,

    /// Per-vehicle outstanding command, indexed by `VehicleId`.
    ///
    /// `Some` means the vehicle is `moving`: it must not be replanned, and
    /// its destination is reserved for it.
    pub in_flight: &'a [Option<InFlight>],
}

impl<'a> PlanContext<'a> {
    #[inline]
    pub fn new(
        track:     &'a Track,
        calls:     &'a CallQueue,
        in_flight: &'a [Option<InFlight>],
    ) -> Self {
        Self { track, calls, in_flight }
    }

    /// `true` if `vehicle` has an outstanding forward command.
    #[inline]
    pub fn is_moving(&self, vehicle: VehicleId) -> bool {
        self.in_flight
            .get(vehicle.index())
            .is_some_and(|f| f.is_some())
    }

    /// `true` if some in-flight command is heading to `station`.
    pub fn is_reserved(&self, station: StationId) -> bool {
        self.reserved_by(station).is_some()
    }

    /// The vehicle whose in-flight command is heading to `station`.
    pub fn reserved_by(&self, station: StationId) -> Option<VehicleId> {
        self.in_flight
            .iter()
            .position(|f| f.is_some_and(|f| f.to == station))
            .map(|i| VehicleId(i as u32))
    }

    /// Reason tag for the hop of a vehicle advancing on its own behalf:
    /// progress if it has a call, otherwise only clearing the way.
    /// Blockers moved for someone else's call are always `MakingSpace`.
    #[inline]
    pub fn reason_for(&self, vehicle: VehicleId) -> MoveReason {
        if self.calls.target_of(vehicle).is_some() {
            MoveReason::MovingToTarget
        } else {
            MoveReason::MakingSpace
        }
    }
}
