//! Device reports and detector reconciliation.

use rl_core::{CommandId, ReportEvent, StationId, VehicleId};
use rl_plan::Call;

use crate::Command;

/// What a device sends after executing (or failing) a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    pub command_id:        CommandId,
    pub event:             ReportEvent,
    /// Station the device believes it was sent to.
    pub expected_station:  StationId,
    /// Station reported by the device's own position detector.
    pub detected_station:  StationId,
    /// Whether the detector trusts its reading.
    pub pattern_confident: bool,
    /// Device-side flag: `expected_station != detected_station`.
    pub mismatch:          bool,
}

impl Report {
    /// An `arrived` report where the detector agrees with the expectation.
    pub fn arrived(command_id: CommandId, station: StationId) -> Self {
        Self {
            command_id,
            event:             ReportEvent::Arrived,
            expected_station:  station,
            detected_station:  station,
            pattern_confident: true,
            mismatch:          false,
        }
    }
}

/// A confident detector reading that disagreed with the server's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Divergence {
    pub expected: StationId,
    pub detected: StationId,
}

/// The station a matching report commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub station:    StationId,
    pub divergence: Option<Divergence>,
}

/// Decide where the vehicle really is.
///
/// A confident detector that disagrees with `expected` wins; in every other
/// case the server's own `expected` stands and the detector is ignored.
pub fn confirm_station(expected: StationId, report: &Report) -> Confirmation {
    if report.pattern_confident && report.detected_station != expected {
        Confirmation {
            station:    report.detected_station,
            divergence: Some(Divergence { expected, detected: report.detected_station }),
        }
    } else {
        Confirmation { station: expected, divergence: None }
    }
}

/// Result of a successfully handled report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The outstanding command was confirmed and the track advanced.
    Arrived {
        vehicle:    VehicleId,
        from:       StationId,
        to:         StationId,
        divergence: Option<Divergence>,
        resolved:   Option<Call>,
        /// Commands issued by the replanning pass that followed.
        issued:     Vec<Command>,
    },

    /// The device reported an error; the vehicle stays where it was.
    Aborted {
        vehicle: VehicleId,
        station: StationId,
        issued:  Vec<Command>,
    },

    /// The report does not match the outstanding command (duplicate or
    /// superseded).  Acknowledged, nothing changed.
    Stale {
        vehicle:     VehicleId,
        command_id:  CommandId,
        outstanding: Option<CommandId>,
    },
}

impl ReportOutcome {
    /// `true` unless the report was stale.
    pub fn mutated(&self) -> bool {
        !matches!(self, ReportOutcome::Stale { .. })
    }
}
