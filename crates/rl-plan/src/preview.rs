//! Non-committing simulations of the planner for dashboards.

use log::debug;

use rl_core::{MoveReason, StationId, VehicleId};
use rl_track::Track;

use crate::{CallQueue, PlanContext, PlanError, PlanResult, plan_pass};

/// One simulated hop in a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewStep {
    /// 1-based position in the preview.
    pub step:         usize,
    pub vehicle:      VehicleId,
    pub from_station: StationId,
    pub to_station:   StationId,
    pub reason:       MoveReason,
}

/// Private copy of the state a preview advances.
struct Sim {
    track: Track,
    calls: CallQueue,
    steps: Vec<PreviewStep>,
}

impl Sim {
    /// Complete a hop instantly and record it.
    fn apply(&mut self, vehicle: VehicleId, to: StationId, reason: MoveReason) -> PlanResult<()> {
        let from = self.track.station_of(vehicle).ok_or(PlanError::NotPlaced(vehicle))?;
        self.track.move_vehicle(vehicle, from, to)?;
        self.calls.resolve(vehicle, to);
        self.steps.push(PreviewStep {
            step:         self.steps.len() + 1,
            vehicle,
            from_station: from,
            to_station:   to,
            reason,
        });
        Ok(())
    }
}

/// Simulate up to `max_steps` hops forward from `ctx` without touching it.
///
/// In-flight hops come first (in vehicle order) since they are already
/// committed to.  They keep the reason they were issued with; one whose
/// destination is occupied is left out.  After that the planner is re-run on
/// the simulated state and every hop of each pass is assumed to complete
/// immediately, resolving calls as vehicles reach their targets.  Stops early once no calls remain or a
/// pass proposes nothing.
pub fn preview(ctx: &PlanContext<'_>, max_steps: usize) -> PlanResult<Vec<PreviewStep>> {
    let mut sim = Sim {
        track: ctx.track.clone(),
        calls: ctx.calls.clone(),
        steps: Vec::new(),
    };

    for (i, flight) in ctx.in_flight.iter().enumerate() {
        if sim.steps.len() >= max_steps {
            break;
        }
        let Some(flight) = *flight else { continue };
        let vehicle = VehicleId(i as u32);
        if !sim.track.is_free(flight.to) {
            debug!("preview skips in-flight hop of {vehicle} into occupied {}", flight.to);
            continue;
        }
        sim.apply(vehicle, flight.to, flight.reason)?;
    }

    let idle = vec![None; ctx.in_flight.len()];
    while sim.steps.len() < max_steps && !sim.calls.is_empty() {
        let hops = plan_pass(&PlanContext::new(&sim.track, &sim.calls, &idle))?;
        if hops.is_empty() {
            break;
        }
        for hop in hops {
            if sim.steps.len() >= max_steps {
                break;
            }
            sim.apply(hop.vehicle, hop.to, hop.reason)?;
        }
    }

    Ok(sim.steps)
}

/// The forward station sequence each vehicle still has to traverse to reach
/// its call target, in vehicle order.  Vehicles without a call get an empty
/// sequence.
pub fn sequences(ctx: &PlanContext<'_>) -> Vec<(VehicleId, Vec<StationId>)> {
    (0..ctx.track.vehicle_count())
        .map(|i| {
            let vehicle = VehicleId(i as u32);
            let seq = match (ctx.track.station_of(vehicle), ctx.calls.target_of(vehicle)) {
                (Some(at), Some(target)) => ctx.track.path(at, target),
                _ => Vec::new(),
            };
            (vehicle, seq)
        })
        .collect()
}
