//! The command dispatcher: monotonic ids, one latest command per vehicle.

use rl_core::{Action, CommandId, MoveReason, StationId, VehicleId};
use rl_plan::{Hop, InFlight};

/// A forward command bound to one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Command {
    pub id:      CommandId,
    pub vehicle: VehicleId,
    pub action:  Action,
    /// Station the vehicle was at when the command was issued.
    pub from:    StationId,
    pub reason:  MoveReason,
}

impl Command {
    /// Station the vehicle is expected to stop at.
    #[inline]
    pub fn expected(&self) -> StationId {
        self.action.expected().unwrap_or(self.from)
    }
}

/// What a polling device receives.
///
/// For `Stop`, `expected_station` is the vehicle's current station and
/// `command_id` the last id issued to it ([`CommandId::NONE`] if none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandTicket {
    pub command_id:       CommandId,
    pub action:           Action,
    pub expected_station: StationId,
}

/// Allocates command ids and remembers each vehicle's latest command.
///
/// `outstanding[v]` is `Some` exactly while vehicle `v` is moving, which makes
/// the dispatcher the single source of truth for vehicle status.  Ids come
/// from one global counter that is never rewound, not even by
/// [`clear`][Self::clear].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    next_id:     CommandId,
    last_issued: Vec<CommandId>,
    outstanding: Vec<Option<Command>>,
}

impl Dispatcher {
    pub fn new(vehicle_count: usize) -> Self {
        Self {
            next_id:     CommandId::FIRST,
            last_issued: vec![CommandId::NONE; vehicle_count],
            outstanding: vec![None; vehicle_count],
        }
    }

    /// Bind a freshly planned hop to the next command id.
    ///
    /// The planner never hands out a hop for a moving vehicle, so the
    /// vehicle has no outstanding command here.
    pub fn issue(&mut self, hop: Hop) -> Command {
        debug_assert!(self.outstanding[hop.vehicle.index()].is_none());
        let id = self.next_id;
        self.next_id = id.next();
        let command = Command {
            id,
            vehicle: hop.vehicle,
            action:  Action::Forward { expected: hop.to },
            from:    hop.from,
            reason:  hop.reason,
        };
        self.last_issued[hop.vehicle.index()] = id;
        self.outstanding[hop.vehicle.index()] = Some(command);
        command
    }

    /// The ticket for a poll by `vehicle`, resting at `station` unless it
    /// has an outstanding command.  Does not allocate: repeated polls with
    /// no decision in between return identical tickets.
    pub fn poll(&self, vehicle: VehicleId, station: StationId) -> CommandTicket {
        match self.outstanding(vehicle) {
            Some(cmd) => CommandTicket {
                command_id:       cmd.id,
                action:           cmd.action,
                expected_station: cmd.expected(),
            },
            None => CommandTicket {
                command_id:       self.last_issued(vehicle),
                action:           Action::Stop,
                expected_station: station,
            },
        }
    }

    /// The unconfirmed forward command of `vehicle`, if it is moving.
    #[inline]
    pub fn outstanding(&self, vehicle: VehicleId) -> Option<&Command> {
        self.outstanding.get(vehicle.index()).and_then(Option::as_ref)
    }

    /// The last id issued to `vehicle`, [`CommandId::NONE`] if none.
    #[inline]
    pub fn last_issued(&self, vehicle: VehicleId) -> CommandId {
        self.last_issued
            .get(vehicle.index())
            .copied()
            .unwrap_or(CommandId::NONE)
    }

    /// Mark `vehicle`'s outstanding command as confirmed and return it.
    pub fn complete(&mut self, vehicle: VehicleId) -> Option<Command> {
        self.outstanding.get_mut(vehicle.index()).and_then(Option::take)
    }

    /// `true` if `id` was handed out by this dispatcher at some point.
    #[inline]
    pub fn was_issued(&self, id: CommandId) -> bool {
        id >= CommandId::FIRST && id < self.next_id
    }

    /// The id the next [`issue`][Self::issue] will use.
    #[inline]
    pub fn next_id(&self) -> CommandId {
        self.next_id
    }

    /// Outstanding command per vehicle, for [`rl_plan::PlanContext`].
    pub fn in_flight(&self) -> Vec<Option<InFlight>> {
        self.outstanding
            .iter()
            .map(|c| c.as_ref().map(|c| InFlight::new(c.expected(), c.reason)))
            .collect()
    }

    /// Forget all per-vehicle commands.  The id counter keeps running so
    /// ids from before the clear can never be honoured again.
    pub fn clear(&mut self) {
        self.last_issued.iter_mut().for_each(|id| *id = CommandId::NONE);
        self.outstanding.iter_mut().for_each(|c| *c = None);
    }
}
