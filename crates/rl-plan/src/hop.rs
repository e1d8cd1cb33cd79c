//! Planned moves.

use std::fmt;

use rl_core::{MoveReason, StationId, VehicleId};

/// A single one-station forward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hop {
    pub vehicle: VehicleId,
    pub from:    StationId,
    pub to:      StationId,
    pub reason:  MoveReason,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}→{} ({})", self.vehicle, self.from, self.to, self.reason)
    }
}

/// The hops needed to let one vehicle advance one station.
///
/// `hops` is ordered innermost first: `hops[0]` moves into a free station,
/// each following hop moves into the station the previous one vacated, and
/// the last hop is the requesting vehicle's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// The vehicle that wants to advance.
    pub vehicle: VehicleId,
    pub hops:    Vec<Hop>,
}

impl Chain {
    /// The hop that can execute first.
    #[inline]
    pub fn innermost(&self) -> &Hop {
        &self.hops[0]
    }

    /// The requesting vehicle's own hop.
    #[inline]
    pub fn own(&self) -> &Hop {
        &self.hops[self.hops.len() - 1]
    }

    /// Number of vehicles that must vacate before the requester can move.
    #[inline]
    pub fn blockers(&self) -> usize {
        self.hops.len() - 1
    }
}
