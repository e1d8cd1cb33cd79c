//! Simulated vehicle devices.
//!
//! A device polls its command, "drives" one station forward when told to,
//! and reports what its position detector saw.  The detector misreads with
//! probability `mismatch_rate`, reporting the station after the expected
//! one; half of those misreadings are flagged as confident.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rl_core::{Action, CommandId, ReportEvent, StationId, VehicleId};
use rl_fleet::{ErrorKind, FleetObserver, FleetResult, Report, ReportOutcome, SharedFleet};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// One confirmed hop, as written to the trace.
#[derive(Debug, Clone)]
pub struct HopRecord {
    pub vehicle:    String,
    pub command_id: CommandId,
    pub from:       StationId,
    pub to:         StationId,
    pub corrected:  bool,
}

pub struct Device {
    vehicle:       VehicleId,
    name:          String,
    station_count: u32,
    mismatch_rate: f64,
    rng:           SmallRng,
    /// Set after a rejected report so the next attempt reads honestly.
    retry_honest:  bool,
}

impl Device {
    pub fn new(
        vehicle:       VehicleId,
        name:          String,
        station_count: u32,
        mismatch_rate: f64,
        seed:          u64,
    ) -> Self {
        let seed = seed ^ (vehicle.get() as u64).wrapping_mul(MIXING_CONSTANT);
        Self {
            vehicle,
            name,
            station_count,
            mismatch_rate: mismatch_rate.clamp(0.0, 1.0),
            rng: SmallRng::seed_from_u64(seed),
            retry_honest: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Poll once and act on the answer.
    ///
    /// Returns the confirmed hop if this poll moved the vehicle.  Conflicts
    /// caused by a bad detector reading are absorbed: the report is retried
    /// with an honest reading on the next poll.
    pub fn step<O: FleetObserver>(
        &mut self,
        fleet: &SharedFleet<O>,
    ) -> FleetResult<Option<HopRecord>> {
        let ticket = fleet.command(self.vehicle)?;
        let Action::Forward { expected } = ticket.action else {
            return Ok(None);
        };

        let report = self.observe(ticket.command_id, expected);
        match fleet.report(self.vehicle, &report) {
            Ok(ReportOutcome::Arrived { from, to, divergence, .. }) => {
                self.retry_honest = false;
                Ok(Some(HopRecord {
                    vehicle:    self.name.clone(),
                    command_id: ticket.command_id,
                    from,
                    to,
                    corrected:  divergence.is_some(),
                }))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::Conflict || e.kind() == ErrorKind::Validation => {
                log::warn!("device {}: report rejected ({e}); retrying", self.name);
                self.retry_honest = true;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn observe(&mut self, command_id: CommandId, expected: StationId) -> Report {
        let misread = !self.retry_honest && self.rng.gen_bool(self.mismatch_rate);
        if !misread {
            return Report::arrived(command_id, expected);
        }
        let detected = StationId(expected.get() % self.station_count + 1);
        Report {
            command_id,
            event:             ReportEvent::Arrived,
            expected_station:  expected,
            detected_station:  detected,
            pattern_confident: self.rng.gen_bool(0.5),
            mismatch:          true,
        }
    }
}
