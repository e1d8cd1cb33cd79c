//! Loop configuration.

use crate::{CoreError, CoreResult, VehicleId};

/// Top-level loop configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// `Fleet::new`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// Number of stations N on the loop.  Stations are numbered `1..=N`.
    pub station_count: u32,

    /// Display names of the K vehicles.  `VehicleId(i)` is `vehicle_names[i]`.
    pub vehicle_names: Vec<String>,

    /// Maximum number of hops simulated by the dashboard preview.
    pub preview_steps: usize,
}

impl Default for LoopConfig {
    /// Four stations, vehicles `a`, `b`, `c`, ten preview steps.
    fn default() -> Self {
        Self {
            station_count: 4,
            vehicle_names: vec!["a".into(), "b".into(), "c".into()],
            preview_steps: 10,
        }
    }
}

impl LoopConfig {
    /// Number of vehicles K.
    #[inline]
    pub fn vehicle_count(&self) -> usize {
        self.vehicle_names.len()
    }

    /// Check the configuration is usable.
    ///
    /// `station_count <= vehicle_count` passes here; the fleet refuses it
    /// separately because a full loop can never move.
    pub fn validate(&self) -> CoreResult<()> {
        if self.station_count == 0 {
            return Err(CoreError::Config("station_count must be at least 1".into()));
        }
        if self.vehicle_names.is_empty() {
            return Err(CoreError::Config("at least one vehicle is required".into()));
        }
        if self.preview_steps == 0 {
            return Err(CoreError::Config("preview_steps must be at least 1".into()));
        }
        for (i, name) in self.vehicle_names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(CoreError::Config(format!("vehicle {i} has an empty name")));
            }
            if self.vehicle_names[..i].contains(name) {
                return Err(CoreError::Config(format!("duplicate vehicle name {name:?}")));
            }
        }
        Ok(())
    }

    /// Look up a vehicle by display name.
    pub fn vehicle_id(&self, name: &str) -> CoreResult<VehicleId> {
        self.vehicle_names
            .iter()
            .position(|n| n == name)
            .map(|i| VehicleId(i as u32))
            .ok_or_else(|| CoreError::UnknownVehicleName(name.to_string()))
    }

    /// Display name for `vehicle`, or `"?"` if out of range.
    pub fn vehicle_name(&self, vehicle: VehicleId) -> &str {
        self.vehicle_names
            .get(vehicle.index())
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Iterate all vehicle ids in index order.
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleId> + '_ {
        (0..self.vehicle_names.len()).map(|i| VehicleId(i as u32))
    }
}
