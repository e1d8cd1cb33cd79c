//! Fleet observer trait for logging and event collection.

use log::{debug, error, info, warn};

use rl_core::{CommandId, LoopConfig, StationId, VehicleId};
use rl_plan::Call;

use crate::{Command, Divergence};

/// Callbacks invoked by [`Fleet`][crate::Fleet] as state changes.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Hooks run inside the request's
/// critical section and must not block.
pub trait FleetObserver {
    /// A forward command was bound to a vehicle.
    fn on_command_issued(&mut self, _command: &Command) {}

    /// A report confirmed `vehicle` at `to`.
    fn on_arrival(&mut self, _vehicle: VehicleId, _from: StationId, _to: StationId) {}

    /// A confident detector overrode the server's expected station.
    fn on_divergence(&mut self, _vehicle: VehicleId, _divergence: Divergence) {}

    /// A vehicle reached its call target and the call was removed.
    fn on_call_resolved(&mut self, _call: &Call) {}

    /// A report did not match the outstanding command and was ignored.
    fn on_stale_report(&mut self, _vehicle: VehicleId, _command_id: CommandId) {}

    /// A device reported that it failed to execute `command`.
    fn on_command_failed(&mut self, _command: &Command) {}

    /// All state was cleared.
    fn on_reset(&mut self) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

/// A [`FleetObserver`] that writes every event to the `log` facade, naming
/// vehicles by their configured display names.
pub struct LogObserver {
    names: Vec<String>,
}

impl LogObserver {
    pub fn new(config: &LoopConfig) -> Self {
        Self { names: config.vehicle_names.clone() }
    }

    fn name(&self, vehicle: VehicleId) -> &str {
        self.names.get(vehicle.index()).map(String::as_str).unwrap_or("?")
    }
}

impl FleetObserver for LogObserver {
    fn on_command_issued(&mut self, command: &Command) {
        info!(
            "vehicle {}: {} {} {}→{} ({})",
            self.name(command.vehicle),
            command.id,
            command.action.as_str(),
            command.from,
            command.expected(),
            command.reason,
        );
    }

    fn on_arrival(&mut self, vehicle: VehicleId, from: StationId, to: StationId) {
        info!("vehicle {} arrived at {to} (from {from})", self.name(vehicle));
    }

    fn on_divergence(&mut self, vehicle: VehicleId, divergence: Divergence) {
        warn!(
            "vehicle {} position mismatch: expected {}, detector reported {}; trusting detector",
            self.name(vehicle),
            divergence.expected,
            divergence.detected,
        );
    }

    fn on_call_resolved(&mut self, call: &Call) {
        info!("vehicle {} reached target {}", self.name(call.vehicle), call.target);
    }

    fn on_stale_report(&mut self, vehicle: VehicleId, command_id: CommandId) {
        debug!("vehicle {}: ignoring stale report for {command_id}", self.name(vehicle));
    }

    fn on_command_failed(&mut self, command: &Command) {
        error!(
            "vehicle {} reported an error executing {} ({}→{})",
            self.name(command.vehicle),
            command.id,
            command.from,
            command.expected(),
        );
    }

    fn on_reset(&mut self) {
        info!("fleet state reset");
    }
}
