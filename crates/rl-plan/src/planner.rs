//! The movement planner: blocking-chain resolution and planning passes.

use log::debug;

use rl_core::{MoveReason, StationId, VehicleId};

use crate::{Chain, ConsistencyViolation, Hop, PlanContext, PlanError, PlanResult};

/// Build the chain of hops that lets `vehicle` advance one station.
///
/// Walks forward from the station after `vehicle`, collecting each occupant,
/// until a free station turns up.  With K vehicles at most K + 1 stations
/// are probed; the walk fails with [`ConsistencyViolation::NoFreeStation`]
/// if the bound is exhausted or the walk comes back around to `vehicle`.
///
/// In-flight reservations are ignored here: the chain describes occupancy
/// only.  [`plan_pass`] decides whether its first hop may be dispatched.
pub fn blocking_chain(ctx: &PlanContext<'_>, vehicle: VehicleId) -> PlanResult<Chain> {
    let track = ctx.track;
    let from = track.station_of(vehicle).ok_or(PlanError::NotPlaced(vehicle))?;

    let bound = track.vehicle_count() + 1;
    let mut blockers: Vec<(VehicleId, StationId)> = Vec::new();
    let mut probe = track.successor(from);
    let mut free = None;

    for _ in 0..bound {
        match track.occupant(probe) {
            None => {
                free = Some(probe);
                break;
            }
            Some(w) if w == vehicle => break,
            Some(w) => {
                blockers.push((w, probe));
                probe = track.successor(probe);
            }
        }
    }

    let Some(free) = free else {
        return Err(ConsistencyViolation::NoFreeStation {
            vehicle,
            from,
            probed: blockers.len() + 1,
        }
        .into());
    };

    // Innermost first: the blocker next to the gap moves into it, every
    // other blocker follows into the station just vacated.  Blockers move
    // for `vehicle`'s sake, whatever calls of their own they have.
    let mut hops = Vec::with_capacity(blockers.len() + 1);
    let mut into = free;
    for &(w, at) in blockers.iter().rev() {
        hops.push(Hop { vehicle: w, from: at, to: into, reason: MoveReason::MakingSpace });
        into = at;
    }
    hops.push(Hop { vehicle, from, to: into, reason: ctx.reason_for(vehicle) });

    Ok(Chain { vehicle, hops })
}

/// Run one planning pass and return the hops to dispatch now.
///
/// Pending calls are visited in submission order.  For each idle vehicle
/// with a call, its blocking chain is built and the chain's innermost hop
/// is dispatched when
///
/// - its mover is idle and has not been given a hop earlier in this pass, and
/// - its destination is neither reserved by an in-flight command nor claimed
///   earlier in this pass.
///
/// Otherwise the call waits for a later pass.  Moving vehicles are never
/// replanned, so each vehicle has at most one outstanding hop.
pub fn plan_pass(ctx: &PlanContext<'_>) -> PlanResult<Vec<Hop>> {
    let track = ctx.track;
    let mut decided = vec![false; track.vehicle_count()];
    let mut claimed = Vec::new();
    let mut hops = Vec::new();

    for call in ctx.calls.iter() {
        let v = call.vehicle;
        if ctx.is_moving(v) || decided[v.index()] {
            continue;
        }
        let at = track.station_of(v).ok_or(PlanError::NotPlaced(v))?;
        if at == call.target {
            continue;
        }

        let chain = blocking_chain(ctx, v)?;
        let hop = *chain.innermost();

        if ctx.is_moving(hop.vehicle)
            || decided[hop.vehicle.index()]
            || ctx.is_reserved(hop.to)
            || claimed.contains(&hop.to)
        {
            debug!("{v} waits: {hop} is blocked by an earlier decision or in-flight command");
            continue;
        }

        debug!("{v} → {} (chain of {}): dispatch {hop}", call.target, chain.blockers());
        decided[hop.vehicle.index()] = true;
        claimed.push(hop.to);
        hops.push(hop);
    }

    Ok(hops)
}
