//! `SharedFleet` — a [`Fleet`] behind an `RwLock` for concurrent handlers.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rl_core::{LoopConfig, StationId, VehicleId};

use crate::{
    CallOutcome, CallView, CommandTicket, DashboardView, Fleet, FleetError, FleetObserver, FleetResult,
    Health, LogObserver, PositionView, Report, ReportOutcome, SequenceView, StatusView,
};

/// Thread-safe handle around a [`Fleet`].
///
/// Mutating requests take the write lock for their whole
/// validate → mutate → replan sequence; read requests share the read lock
/// and always see a state between two requests.
pub struct SharedFleet<O: FleetObserver = LogObserver> {
    inner: RwLock<Fleet<O>>,
}

fn poisoned<T>(_: PoisonError<T>) -> FleetError {
    FleetError::Internal("fleet lock poisoned".into())
}

impl SharedFleet<LogObserver> {
    pub fn new(config: LoopConfig) -> FleetResult<Self> {
        Ok(Self::from_fleet(Fleet::new(config)?))
    }
}

impl<O: FleetObserver> SharedFleet<O> {
    pub fn from_fleet(fleet: Fleet<O>) -> Self {
        Self { inner: RwLock::new(fleet) }
    }

    pub fn into_inner(self) -> FleetResult<Fleet<O>> {
        self.inner.into_inner().map_err(poisoned)
    }

    /// Direct read access, for callers that need several projections from
    /// one consistent state.
    pub fn read(&self) -> FleetResult<RwLockReadGuard<'_, Fleet<O>>> {
        self.inner.read().map_err(poisoned)
    }

    pub fn write(&self) -> FleetResult<RwLockWriteGuard<'_, Fleet<O>>> {
        self.inner.write().map_err(poisoned)
    }

    // ── Mutating ──────────────────────────────────────────────────────────

    pub fn initialize(&self, positions: &[(VehicleId, StationId)]) -> FleetResult<()> {
        self.write()?.initialize(positions)
    }

    pub fn call(&self, vehicle: VehicleId, target: StationId) -> FleetResult<CallOutcome> {
        self.write()?.call(vehicle, target)
    }

    pub fn report(&self, vehicle: VehicleId, report: &Report) -> FleetResult<ReportOutcome> {
        self.write()?.report(vehicle, report)
    }

    pub fn reset(&self) -> FleetResult<()> {
        self.write()?.reset();
        Ok(())
    }

    // ── Read-only ─────────────────────────────────────────────────────────

    pub fn vehicle_id(&self, name: &str) -> FleetResult<VehicleId> {
        self.read()?.vehicle_id(name)
    }

    pub fn is_settled(&self) -> FleetResult<bool> {
        Ok(self.read()?.is_settled())
    }

    pub fn command(&self, vehicle: VehicleId) -> FleetResult<CommandTicket> {
        self.read()?.command(vehicle)
    }

    pub fn health(&self) -> FleetResult<Health> {
        Ok(self.read()?.health())
    }

    pub fn status(&self) -> FleetResult<StatusView> {
        Ok(self.read()?.status())
    }

    pub fn pending_calls(&self) -> FleetResult<Vec<CallView>> {
        Ok(self.read()?.pending_calls())
    }

    pub fn positions(&self) -> FleetResult<Vec<PositionView>> {
        self.read()?.positions()
    }

    pub fn sequences(&self) -> FleetResult<Vec<SequenceView>> {
        self.read()?.sequences()
    }

    pub fn dashboard(&self) -> FleetResult<DashboardView> {
        self.read()?.dashboard()
    }
}
