//! The `Track` — station occupancy on a closed forward-only loop.

use rl_core::{StationId, VehicleId};

use crate::{TrackError, TrackResult};

/// Occupancy of every station plus the position of every vehicle.
///
/// `occupants` is indexed by [`StationId::slot`] and always has length
/// `station_count`.  `positions` is indexed by [`VehicleId::index`] and always
/// has length `vehicle_count`; `None` means the vehicle has not been placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    occupants: Vec<Option<VehicleId>>,
    positions: Vec<Option<StationId>>,
}

impl Track {
    /// Create an empty track with `station_count` stations and room for
    /// `vehicle_count` vehicles.
    pub fn new(station_count: u32, vehicle_count: usize) -> Self {
        Self {
            occupants: vec![None; station_count as usize],
            positions: vec![None; vehicle_count],
        }
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Number of stations N.
    #[inline]
    pub fn station_count(&self) -> u32 {
        self.occupants.len() as u32
    }

    /// Number of vehicles K this track was sized for.
    #[inline]
    pub fn vehicle_count(&self) -> usize {
        self.positions.len()
    }

    /// Validate that `station` lies on this track.
    pub fn check(&self, station: StationId) -> TrackResult<StationId> {
        if station.in_range(self.station_count()) {
            Ok(station)
        } else {
            Err(TrackError::StationOutOfRange {
                station,
                station_count: self.station_count(),
            })
        }
    }

    /// The next station in travel direction.  `N` wraps to `1`.
    #[inline]
    pub fn successor(&self, station: StationId) -> StationId {
        StationId(station.0 % self.station_count() + 1)
    }

    /// The previous station.  `1` wraps to `N`.
    #[inline]
    pub fn predecessor(&self, station: StationId) -> StationId {
        let n = self.station_count();
        StationId((station.0 + n - 2) % n + 1)
    }

    /// Forward hop count from `from` to `to`; `0` when they are equal.
    #[inline]
    pub fn distance(&self, from: StationId, to: StationId) -> u32 {
        let n = self.station_count();
        (to.0 + n - from.0) % n
    }

    /// Stations visited travelling forward from `from` to `to`, excluding
    /// `from` and including `to`.  Empty when `from == to`.
    pub fn path(&self, from: StationId, to: StationId) -> Vec<StationId> {
        let hops = self.distance(from, to);
        let mut out = Vec::with_capacity(hops as usize);
        let mut at = from;
        for _ in 0..hops {
            at = self.successor(at);
            out.push(at);
        }
        out
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The vehicle at `station`, if any.  Out-of-range stations read as empty.
    #[inline]
    pub fn occupant(&self, station: StationId) -> Option<VehicleId> {
        self.occupants.get(station.slot()).copied().flatten()
    }

    #[inline]
    pub fn is_free(&self, station: StationId) -> bool {
        self.occupant(station).is_none()
    }

    /// Current station of `vehicle`, or `None` if it has not been placed.
    #[inline]
    pub fn station_of(&self, vehicle: VehicleId) -> Option<StationId> {
        self.positions.get(vehicle.index()).copied().flatten()
    }

    /// Number of occupied stations.
    pub fn occupied_count(&self) -> usize {
        self.occupants.iter().filter(|o| o.is_some()).count()
    }

    /// All unoccupied stations in ascending order.
    pub fn free_stations(&self) -> Vec<StationId> {
        self.occupants
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(|(slot, _)| StationId::from_slot(slot))
            .collect()
    }

    /// `(station, occupant)` for every station in ascending order.
    pub fn stations(&self) -> impl Iterator<Item = (StationId, Option<VehicleId>)> + '_ {
        self.occupants
            .iter()
            .enumerate()
            .map(|(slot, o)| (StationId::from_slot(slot), *o))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Put an unplaced `vehicle` on a free `station`.
    pub fn place(&mut self, vehicle: VehicleId, station: StationId) -> TrackResult<()> {
        self.check(station)?;
        match self.positions.get(vehicle.index()) {
            None          => return Err(TrackError::UnknownVehicle(vehicle)),
            Some(Some(_)) => return Err(TrackError::AlreadyPlaced(vehicle)),
            Some(None)    => {}
        }
        if let Some(occupant) = self.occupant(station) {
            return Err(TrackError::Occupied { station, occupant });
        }
        self.occupants[station.slot()] = Some(vehicle);
        self.positions[vehicle.index()] = Some(station);
        Ok(())
    }

    /// Move `vehicle` from `from` to `to` as one step.
    ///
    /// Nothing is modified unless every check passes.  `from == to` is an
    /// accepted no-op so a report confirming "did not move" commits cleanly.
    pub fn move_vehicle(
        &mut self,
        vehicle: VehicleId,
        from:    StationId,
        to:      StationId,
    ) -> TrackResult<()> {
        self.check(from)?;
        self.check(to)?;
        if vehicle.index() >= self.positions.len() {
            return Err(TrackError::UnknownVehicle(vehicle));
        }
        if self.occupant(from) != Some(vehicle) {
            return Err(TrackError::NotAt { vehicle, station: from });
        }
        if from == to {
            return Ok(());
        }
        if let Some(occupant) = self.occupant(to) {
            return Err(TrackError::Occupied { station: to, occupant });
        }
        self.occupants[from.slot()] = None;
        self.occupants[to.slot()] = Some(vehicle);
        self.positions[vehicle.index()] = Some(to);
        Ok(())
    }

    /// Remove every vehicle from the track.
    pub fn clear(&mut self) {
        self.occupants.iter_mut().for_each(|o| *o = None);
        self.positions.iter_mut().for_each(|p| *p = None);
    }
}
