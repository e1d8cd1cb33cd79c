//! The `Fleet` — the single owned state object every request goes through.

use log::{debug, error, info, warn};

use rl_core::{LoopConfig, ReportEvent, StationId, VehicleId, VehicleStatus};
use rl_plan::{
    Call, CallQueue, ConsistencyViolation, PlanContext, PlanError, SubmitOutcome, plan_pass,
    preview, sequences,
};
use rl_track::Track;

use crate::{
    CallView, Command, CommandTicket, DashboardView, Dispatcher, FleetError, FleetObserver,
    FleetResult, Health, LogObserver, PositionView, Report, ReportOutcome, SequenceView,
    StationView, StatusView, VehicleView, confirm_station,
};

/// Result of [`Fleet::call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The call was queued; `issued` holds the commands the following
    /// planning pass produced (possibly for other vehicles).
    Queued { call: Call, issued: Vec<Command> },
    /// The vehicle is already at the requested station.  Nothing stored.
    AlreadyThere,
}

/// All fleet state: occupancy, pending calls, and commands.
///
/// Mutating operations take `&mut self` and run their whole
/// validate → mutate → replan sequence before returning, so they are atomic
/// with respect to each other.  Validation always completes before the first
/// mutation: a rejected request leaves the fleet untouched.
///
/// `O` receives events as they happen; [`LogObserver`] is the default.
pub struct Fleet<O: FleetObserver = LogObserver> {
    config:      LoopConfig,
    track:       Track,
    calls:       CallQueue,
    dispatcher:  Dispatcher,
    initialized: bool,
    observer:    O,
}

impl Fleet<LogObserver> {
    /// Create an uninitialized fleet that logs its events.
    pub fn new(config: LoopConfig) -> FleetResult<Self> {
        let observer = LogObserver::new(&config);
        Self::with_observer(config, observer)
    }
}

impl<O: FleetObserver> Fleet<O> {
    /// Create an uninitialized fleet reporting to `observer`.
    ///
    /// # Errors
    ///
    /// [`FleetError::Config`] for an invalid config, and
    /// [`FleetError::Consistency`] if the loop has no more stations than
    /// vehicles: such a loop can never have a free station to move into.
    pub fn with_observer(config: LoopConfig, observer: O) -> FleetResult<Self> {
        config.validate()?;
        let vehicles = config.vehicle_count();
        if config.station_count as usize <= vehicles {
            let violation = ConsistencyViolation::FullLoop {
                stations: config.station_count,
                vehicles,
            };
            error!("{violation}");
            return Err(violation.into());
        }
        Ok(Self {
            track:       Track::new(config.station_count, vehicles),
            calls:       CallQueue::new(),
            dispatcher:  Dispatcher::new(vehicles),
            initialized: false,
            observer,
            config,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn calls(&self) -> &CallQueue {
        &self.calls
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Look up a vehicle by its configured name.
    pub fn vehicle_id(&self, name: &str) -> FleetResult<VehicleId> {
        Ok(self.config.vehicle_id(name)?)
    }

    /// `Moving` while the vehicle has an unconfirmed forward command.
    pub fn vehicle_status(&self, vehicle: VehicleId) -> VehicleStatus {
        if self.dispatcher.outstanding(vehicle).is_some() {
            VehicleStatus::Moving
        } else {
            VehicleStatus::Idle
        }
    }

    /// `true` once no calls are pending and no vehicle is moving.
    pub fn is_settled(&self) -> bool {
        self.calls.is_empty() && self.dispatcher.in_flight().iter().all(Option::is_none)
    }

    // ── Mutating operations ───────────────────────────────────────────────

    /// Place every vehicle and bring the fleet online.
    ///
    /// `positions` must name each configured vehicle exactly once, with
    /// pairwise distinct stations in `1..=N`.  Afterwards all vehicles are
    /// idle with no commands and no calls.
    pub fn initialize(&mut self, positions: &[(VehicleId, StationId)]) -> FleetResult<()> {
        if self.initialized {
            return Err(FleetError::AlreadyInitialized);
        }
        let vehicles = self.config.vehicle_count();
        if positions.len() != vehicles {
            return Err(FleetError::InvalidPositions(format!(
                "expected {vehicles} positions, got {}",
                positions.len()
            )));
        }

        // Build into a scratch track so a rejected request mutates nothing.
        let mut track = Track::new(self.config.station_count, vehicles);
        for &(vehicle, station) in positions {
            self.check_vehicle(vehicle)?;
            track.check(station)?;
            if track.station_of(vehicle).is_some() {
                return Err(FleetError::InvalidPositions(format!(
                    "vehicle {} listed twice",
                    self.config.vehicle_name(vehicle)
                )));
            }
            if let Some(other) = track.occupant(station) {
                return Err(FleetError::InvalidPositions(format!(
                    "vehicles {} and {} both at {station}",
                    self.config.vehicle_name(other),
                    self.config.vehicle_name(vehicle)
                )));
            }
            track.place(vehicle, station)?;
        }

        self.track = track;
        self.calls.clear();
        self.dispatcher.clear();
        self.initialized = true;
        info!(
            "fleet initialized on {} stations: {}",
            self.config.station_count,
            self.describe_positions()
        );
        self.replan()?;
        Ok(())
    }

    /// Ask for `vehicle` to be brought to `target`.
    pub fn call(&mut self, vehicle: VehicleId, target: StationId) -> FleetResult<CallOutcome> {
        self.require_initialized()?;
        self.check_vehicle(vehicle)?;
        self.track.check(target)?;

        let resting_at = match self.vehicle_status(vehicle) {
            VehicleStatus::Idle   => self.track.station_of(vehicle),
            VehicleStatus::Moving => None,
        };
        let name = self.config.vehicle_name(vehicle);
        match self.calls.submit(vehicle, target, resting_at) {
            Ok(SubmitOutcome::AlreadyThere) => {
                info!("vehicle {name} is already at {target}");
                Ok(CallOutcome::AlreadyThere)
            }
            Ok(SubmitOutcome::Queued(call)) => {
                info!("queued call: vehicle {name} to {target}");
                let issued = self.replan()?;
                Ok(CallOutcome::Queued { call, issued })
            }
            Err(e) => {
                warn!("rejected call for vehicle {name}: {e}");
                Err(e.into())
            }
        }
    }

    /// Handle a device report for `vehicle`.
    ///
    /// A report whose `command_id` is not the vehicle's outstanding command
    /// is acknowledged as [`ReportOutcome::Stale`] without touching anything.
    /// A matching report commits the confirmed station, resolves the call if
    /// the target was reached, and replans.
    pub fn report(&mut self, vehicle: VehicleId, report: &Report) -> FleetResult<ReportOutcome> {
        self.require_initialized()?;
        self.check_vehicle(vehicle)?;
        if !self.dispatcher.was_issued(report.command_id) {
            warn!(
                "vehicle {} reported {} which was never issued",
                self.config.vehicle_name(vehicle),
                report.command_id
            );
            return Err(FleetError::UnknownCommand { vehicle, command_id: report.command_id });
        }

        let command = match self.dispatcher.outstanding(vehicle) {
            Some(cmd) if cmd.id == report.command_id => *cmd,
            other => {
                let outstanding = other.map(|c| c.id);
                self.observer.on_stale_report(vehicle, report.command_id);
                return Ok(ReportOutcome::Stale {
                    vehicle,
                    command_id: report.command_id,
                    outstanding,
                });
            }
        };

        let expected = command.expected();
        if report.expected_station != expected {
            warn!(
                "vehicle {} believes it was sent to {}, server record says {expected}",
                self.config.vehicle_name(vehicle),
                report.expected_station
            );
        }

        match report.event {
            ReportEvent::Error => {
                self.dispatcher.complete(vehicle);
                self.observer.on_command_failed(&command);
                let issued = self.replan()?;
                Ok(ReportOutcome::Aborted { vehicle, station: command.from, issued })
            }
            ReportEvent::Arrived => self.commit_arrival(command, report),
        }
    }

    /// Drop all state.  The fleet must be initialized again before use.
    ///
    /// The command id counter is not rewound, so a device still holding a
    /// pre-reset id can never have it honoured.
    pub fn reset(&mut self) {
        self.track.clear();
        self.calls.clear();
        self.dispatcher.clear();
        self.initialized = false;
        self.observer.on_reset();
    }

    // ── Read operations ───────────────────────────────────────────────────

    /// The command a polling device should execute.  Idempotent.
    pub fn command(&self, vehicle: VehicleId) -> FleetResult<CommandTicket> {
        self.require_initialized()?;
        self.check_vehicle(vehicle)?;
        let station = self.station_of(vehicle)?;
        let ticket = self.dispatcher.poll(vehicle, station);
        debug!(
            "vehicle {} polled: {} {}",
            self.config.vehicle_name(vehicle),
            ticket.command_id,
            ticket.action
        );
        Ok(ticket)
    }

    pub fn health(&self) -> Health {
        Health { healthy: true, initialized: self.initialized }
    }

    /// Full summary.  Available before initialization (everything empty).
    pub fn status(&self) -> StatusView {
        StatusView {
            initialized:     self.initialized,
            vehicles:        self.vehicle_views(),
            stations:        self.station_views(),
            pending_calls:   self.call_views(),
            next_command_id: self.dispatcher.next_id(),
        }
    }

    /// Pending calls in submission order.  Empty before initialization.
    pub fn pending_calls(&self) -> Vec<CallView> {
        self.call_views()
    }

    /// Current station of every vehicle.
    pub fn positions(&self) -> FleetResult<Vec<PositionView>> {
        self.require_initialized()?;
        self.config
            .vehicles()
            .map(|vehicle| -> FleetResult<PositionView> {
                Ok(PositionView {
                    vehicle,
                    name:    self.config.vehicle_name(vehicle).to_string(),
                    station: self.station_of(vehicle)?,
                })
            })
            .collect()
    }

    /// Stations each vehicle still has to traverse to reach its call target.
    pub fn sequences(&self) -> FleetResult<Vec<SequenceView>> {
        self.require_initialized()?;
        let in_flight = self.dispatcher.in_flight();
        let ctx = PlanContext::new(&self.track, &self.calls, &in_flight);
        Ok(sequences(&ctx)
            .into_iter()
            .map(|(vehicle, sequence)| SequenceView {
                vehicle,
                name: self.config.vehicle_name(vehicle).to_string(),
                sequence,
            })
            .collect())
    }

    /// Status plus a simulated movement plan of up to
    /// `config.preview_steps` hops.  Nothing is committed.
    pub fn dashboard(&self) -> FleetResult<DashboardView> {
        let movement_plan = if self.initialized {
            let in_flight = self.dispatcher.in_flight();
            let ctx = PlanContext::new(&self.track, &self.calls, &in_flight);
            preview(&ctx, self.config.preview_steps).map_err(|e| self.plan_failure(e))?
        } else {
            Vec::new()
        };
        Ok(DashboardView {
            initialized:   self.initialized,
            vehicles:      self.vehicle_views(),
            stations:      self.station_views(),
            pending_calls: self.call_views(),
            movement_plan,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn commit_arrival(&mut self, command: Command, report: &Report) -> FleetResult<ReportOutcome> {
        let vehicle = command.vehicle;
        let confirmation = confirm_station(command.expected(), report);
        let to = self.track.check(confirmation.station)?;
        let from = self.station_of(vehicle)?;

        let device_says_mismatch = report.detected_station != report.expected_station;
        if report.mismatch != device_says_mismatch {
            debug!(
                "vehicle {}: mismatch flag {} disagrees with stations {}/{}",
                self.config.vehicle_name(vehicle),
                report.mismatch,
                report.expected_station,
                report.detected_station
            );
        }

        // Another vehicle's outstanding command owns `to` until it is confirmed.
        let in_flight = self.dispatcher.in_flight();
        let ctx = PlanContext::new(&self.track, &self.calls, &in_flight);
        if let Some(heading) = ctx.reserved_by(to).filter(|&h| h != vehicle) {
            warn!(
                "rejected arrival of vehicle {} at {to}: reserved for vehicle {}",
                self.config.vehicle_name(vehicle),
                self.config.vehicle_name(heading)
            );
            return Err(FleetError::StationReserved { station: to, heading });
        }

        if let Err(e) = self.track.move_vehicle(vehicle, from, to) {
            warn!(
                "rejected arrival of vehicle {} at {to}: {e}",
                self.config.vehicle_name(vehicle)
            );
            return Err(e.into());
        }

        self.dispatcher.complete(vehicle);
        if let Some(divergence) = confirmation.divergence {
            self.observer.on_divergence(vehicle, divergence);
        }
        self.observer.on_arrival(vehicle, from, to);
        let resolved = self.calls.resolve(vehicle, to);
        if let Some(call) = &resolved {
            self.observer.on_call_resolved(call);
        }

        let issued = self.replan()?;
        Ok(ReportOutcome::Arrived {
            vehicle,
            from,
            to,
            divergence: confirmation.divergence,
            resolved,
            issued,
        })
    }

    /// Run a planning pass and issue a command for every proposed hop.
    fn replan(&mut self) -> FleetResult<Vec<Command>> {
        let in_flight = self.dispatcher.in_flight();
        let hops = plan_pass(&PlanContext::new(&self.track, &self.calls, &in_flight))
            .map_err(|e| self.plan_failure(e))?;

        let mut issued = Vec::with_capacity(hops.len());
        for hop in hops {
            let command = self.dispatcher.issue(hop);
            self.observer.on_command_issued(&command);
            issued.push(command);
        }
        Ok(issued)
    }

    fn plan_failure(&self, e: PlanError) -> FleetError {
        if let PlanError::Consistency(violation) = &e {
            error!("planner invariant breached: {violation}; state: {}", self.describe_positions());
        }
        e.into()
    }

    fn require_initialized(&self) -> FleetResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(FleetError::Uninitialized)
        }
    }

    fn check_vehicle(&self, vehicle: VehicleId) -> FleetResult<()> {
        if vehicle.index() < self.config.vehicle_count() {
            Ok(())
        } else {
            Err(FleetError::UnknownVehicle(vehicle))
        }
    }

    fn station_of(&self, vehicle: VehicleId) -> FleetResult<StationId> {
        self.track.station_of(vehicle).ok_or_else(|| {
            FleetError::Internal(format!("{vehicle} has no position after initialization"))
        })
    }

    fn describe_positions(&self) -> String {
        self.config
            .vehicles()
            .map(|v| match self.track.station_of(v) {
                Some(s) => format!("{}@{s}", self.config.vehicle_name(v)),
                None    => format!("{}@-", self.config.vehicle_name(v)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn vehicle_views(&self) -> Vec<VehicleView> {
        let in_flight = self.dispatcher.in_flight();
        self.config
            .vehicles()
            .map(|vehicle| {
                let station = self.track.station_of(vehicle);
                let target = self.calls.target_of(vehicle);
                let sequence = match (station, target) {
                    (Some(at), Some(t)) => self.track.path(at, t),
                    _ => Vec::new(),
                };
                VehicleView {
                    vehicle,
                    name:         self.config.vehicle_name(vehicle).to_string(),
                    station,
                    status:       self.vehicle_status(vehicle),
                    command_id:   self.dispatcher.last_issued(vehicle),
                    target,
                    next_station: in_flight[vehicle.index()].map(|f| f.to),
                    sequence,
                }
            })
            .collect()
    }

    fn station_views(&self) -> Vec<StationView> {
        self.track
            .stations()
            .map(|(station, occupant)| StationView {
                station,
                occupied_by: occupant.map(|v| self.config.vehicle_name(v).to_string()),
            })
            .collect()
    }

    fn call_views(&self) -> Vec<CallView> {
        self.calls
            .iter()
            .map(|c| CallView {
                vehicle:        c.vehicle,
                name:           self.config.vehicle_name(c.vehicle).to_string(),
                target_station: c.target,
            })
            .collect()
    }
}
