//! `CallQueue` — pending "bring vehicle v to station t" requests.

use rl_core::{StationId, VehicleId};

use crate::{PlanError, PlanResult};

/// One pending call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    pub vehicle: VehicleId,
    pub target:  StationId,
    /// Submission order; strictly increasing across the queue's lifetime.
    pub seq:     u64,
}

/// Result of [`CallQueue::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored at the back of the queue.
    Queued(Call),
    /// The vehicle is already at the target; nothing was stored.
    AlreadyThere,
}

/// FIFO of pending calls holding at most one call per vehicle.
///
/// Calls are kept in a `Vec` in submission order.  The fleet is small (K is a
/// handful of vehicles) so linear scans beat any index structure here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallQueue {
    calls:    Vec<Call>,
    next_seq: u64,
}

impl CallQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a call for `vehicle` to go to `target`.
    ///
    /// `resting_at` is the station the vehicle is stopped at, or `None` while
    /// it is moving.  A call to the resting station resolves immediately; a
    /// moving vehicle is always queued since it is about to leave.
    ///
    /// # Errors
    ///
    /// [`PlanError::DuplicateCall`] if `vehicle` already has a pending call.
    /// Station range checks are the caller's job.
    pub fn submit(
        &mut self,
        vehicle:    VehicleId,
        target:     StationId,
        resting_at: Option<StationId>,
    ) -> PlanResult<SubmitOutcome> {
        if let Some(existing) = self.get(vehicle) {
            return Err(PlanError::DuplicateCall { vehicle, target: existing.target });
        }
        if resting_at == Some(target) {
            return Ok(SubmitOutcome::AlreadyThere);
        }
        let call = Call { vehicle, target, seq: self.next_seq };
        self.next_seq += 1;
        self.calls.push(call);
        Ok(SubmitOutcome::Queued(call))
    }

    /// Remove `vehicle`'s call if it has reached its target.
    ///
    /// Returns the removed call, or `None` if there was no call or the
    /// vehicle is not yet at the target.
    pub fn resolve(&mut self, vehicle: VehicleId, current: StationId) -> Option<Call> {
        let pos = self
            .calls
            .iter()
            .position(|c| c.vehicle == vehicle && c.target == current)?;
        Some(self.calls.remove(pos))
    }

    /// The pending call for `vehicle`, if any.
    pub fn get(&self, vehicle: VehicleId) -> Option<&Call> {
        self.calls.iter().find(|c| c.vehicle == vehicle)
    }

    /// Target station of `vehicle`'s pending call.
    #[inline]
    pub fn target_of(&self, vehicle: VehicleId) -> Option<StationId> {
        self.get(vehicle).map(|c| c.target)
    }

    /// All pending calls in submission order.
    #[inline]
    pub fn list(&self) -> &[Call] {
        &self.calls
    }

    pub fn iter(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drop every pending call.  Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}
