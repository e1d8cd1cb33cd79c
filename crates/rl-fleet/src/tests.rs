//! Integration tests for rl-fleet.

use std::sync::Arc;
use std::thread;

use rl_core::{Action, CommandId, LoopConfig, MoveReason, ReportEvent, StationId, VehicleId, VehicleStatus};
use rl_plan::Call;

use crate::{
    CallOutcome, Command, Divergence, ErrorKind, Fleet, FleetError, FleetObserver, NoopObserver,
    Report, ReportOutcome, SharedFleet, confirm_station,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const A: VehicleId = VehicleId(0);
const B: VehicleId = VehicleId(1);
const C: VehicleId = VehicleId(2);

fn s(n: u32) -> StationId {
    StationId(n)
}

fn config(stations: u32, names: &[&str]) -> LoopConfig {
    LoopConfig {
        station_count: stations,
        vehicle_names: names.iter().map(|n| n.to_string()).collect(),
        preview_steps: 10,
    }
}

/// Records every observer callback as a short string.
#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
    issued: Vec<Command>,
}

impl FleetObserver for RecordingObserver {
    fn on_command_issued(&mut self, command: &Command) {
        self.events.push(format!("issue {} {}", command.id, command.vehicle));
        self.issued.push(*command);
    }
    fn on_arrival(&mut self, vehicle: VehicleId, from: StationId, to: StationId) {
        self.events.push(format!("arrive {vehicle} {from}->{to}"));
    }
    fn on_divergence(&mut self, vehicle: VehicleId, d: Divergence) {
        self.events.push(format!("diverge {vehicle} {}/{}", d.expected, d.detected));
    }
    fn on_call_resolved(&mut self, call: &Call) {
        self.events.push(format!("resolved {} {}", call.vehicle, call.target));
    }
    fn on_stale_report(&mut self, vehicle: VehicleId, command_id: CommandId) {
        self.events.push(format!("stale {vehicle} {command_id}"));
    }
    fn on_command_failed(&mut self, command: &Command) {
        self.events.push(format!("failed {}", command.id));
    }
    fn on_reset(&mut self) {
        self.events.push("reset".into());
    }
}

/// Fleet with vehicle `i` placed at `positions[i]`.
fn fleet(stations: u32, positions: &[u32]) -> Fleet<RecordingObserver> {
    let names: Vec<String> = (0..positions.len()).map(|i| format!("v{i}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut f = Fleet::with_observer(config(stations, &names), RecordingObserver::default())
        .unwrap();
    let placed: Vec<_> = positions
        .iter()
        .enumerate()
        .map(|(i, &p)| (VehicleId(i as u32), s(p)))
        .collect();
    f.initialize(&placed).unwrap();
    f
}

/// The outstanding command of `vehicle`, via a poll.
fn poll_forward<O: FleetObserver>(f: &Fleet<O>, vehicle: VehicleId) -> (CommandId, StationId) {
    let ticket = f.command(vehicle).unwrap();
    assert!(ticket.action.is_forward(), "{vehicle} has no forward command");
    (ticket.command_id, ticket.expected_station)
}

/// Poll every vehicle and confirm every forward command as a device would,
/// until nothing moves.  Returns confirmed hops as `(vehicle, from, to)`.
fn drive<O: FleetObserver>(f: &mut Fleet<O>, limit: usize) -> Vec<(VehicleId, u32, u32)> {
    let mut hops = Vec::new();
    loop {
        let mut moved = false;
        let vehicles: Vec<VehicleId> = f.config().vehicles().collect();
        for v in vehicles {
            let ticket = f.command(v).unwrap();
            if !ticket.action.is_forward() {
                continue;
            }
            let outcome = f
                .report(v, &Report::arrived(ticket.command_id, ticket.expected_station))
                .unwrap();
            let ReportOutcome::Arrived { from, to, .. } = outcome else {
                panic!("expected arrival, got {outcome:?}");
            };
            assert_eq!(f.track().occupied_count(), f.config().vehicle_count());
            assert_eq!(
                f.track().free_stations().len(),
                f.config().station_count as usize - f.config().vehicle_count()
            );
            hops.push((v, from.get(), to.get()));
            moved = true;
        }
        if !moved {
            return hops;
        }
        assert!(hops.len() <= limit, "fleet did not settle");
    }
}

// ── Construction and initialization ───────────────────────────────────────────

#[cfg(test)]
mod setup_tests {
    use super::*;

    #[test]
    fn new_fleet_is_uninitialized() {
        let f = Fleet::new(LoopConfig::default()).unwrap();
        assert!(!f.is_initialized());
        assert!(!f.health().initialized);
        assert!(f.health().healthy);
    }

    #[test]
    fn invalid_config_is_a_config_error() {
        let err = Fleet::new(config(0, &["a"])).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn loop_without_free_station_is_rejected() {
        let err = Fleet::new(config(3, &["a", "b", "c"])).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Consistency);
    }

    #[test]
    fn initialize_places_every_vehicle() {
        let f = fleet(4, &[1, 2, 3]);
        assert!(f.is_initialized());
        let positions = f.positions().unwrap();
        let stations: Vec<u32> = positions.iter().map(|p| p.station.get()).collect();
        assert_eq!(stations, vec![1, 2, 3]);
        assert_eq!(positions[0].name, "v0");
        assert!(f.calls().is_empty());
    }

    #[test]
    fn initialize_twice_is_a_conflict() {
        let mut f = fleet(4, &[1, 2, 3]);
        let err = f.initialize(&[(A, s(1)), (B, s(2)), (C, s(3))]).unwrap_err();
        assert_eq!(err, FleetError::AlreadyInitialized);
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn wrong_position_count_is_rejected() {
        let mut f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        let err = f.initialize(&[(A, s(1)), (B, s(2))]).unwrap_err();
        assert!(matches!(err, FleetError::InvalidPositions(_)));
        assert!(!f.is_initialized());
    }

    #[test]
    fn shared_station_is_rejected() {
        let mut f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        let err = f.initialize(&[(A, s(1)), (B, s(1)), (C, s(3))]).unwrap_err();
        assert!(matches!(err, FleetError::InvalidPositions(_)));
        assert!(!f.is_initialized());
        assert_eq!(f.track().occupied_count(), 0);
    }

    #[test]
    fn vehicle_listed_twice_is_rejected() {
        let mut f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        let err = f.initialize(&[(A, s(1)), (A, s(2)), (C, s(3))]).unwrap_err();
        assert!(matches!(err, FleetError::InvalidPositions(_)));
    }

    #[test]
    fn out_of_range_station_is_rejected() {
        let mut f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        let err = f.initialize(&[(A, s(1)), (B, s(5)), (C, s(3))]).unwrap_err();
        assert!(matches!(err, FleetError::StationOutOfRange { .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn unknown_vehicle_is_rejected() {
        let mut f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        let err = f.initialize(&[(A, s(1)), (VehicleId(7), s(2)), (C, s(3))]).unwrap_err();
        assert_eq!(err, FleetError::UnknownVehicle(VehicleId(7)));
    }

    #[test]
    fn vehicle_names_resolve() {
        let f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        assert_eq!(f.vehicle_id("b").unwrap(), B);
        assert_eq!(
            f.vehicle_id("z").unwrap_err(),
            FleetError::UnknownVehicleName("z".into())
        );
    }
}

// ── Requests before initialization ────────────────────────────────────────────

#[cfg(test)]
mod uninitialized_tests {
    use super::*;

    #[test]
    fn requests_need_initialization() {
        let mut f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        assert_eq!(f.command(A).unwrap_err(), FleetError::Uninitialized);
        assert_eq!(f.call(A, s(2)).unwrap_err(), FleetError::Uninitialized);
        assert_eq!(
            f.report(A, &Report::arrived(CommandId(1), s(2))).unwrap_err(),
            FleetError::Uninitialized
        );
        assert_eq!(f.positions().unwrap_err(), FleetError::Uninitialized);
        assert_eq!(f.sequences().unwrap_err(), FleetError::Uninitialized);
        assert_eq!(FleetError::Uninitialized.kind(), ErrorKind::Uninitialized);
    }

    #[test]
    fn status_and_dashboard_work_before_initialization() {
        let f = Fleet::new(config(4, &["a", "b", "c"])).unwrap();
        let status = f.status();
        assert!(!status.initialized);
        assert_eq!(status.stations.len(), 4);
        assert!(status.stations.iter().all(|st| st.occupied_by.is_none()));
        assert!(status.vehicles.iter().all(|v| v.station.is_none()));
        assert!(f.dashboard().unwrap().movement_plan.is_empty());
    }
}

// ── Calls ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod call_tests {
    use super::*;

    #[test]
    fn call_to_current_station_resolves_immediately() {
        let mut f = fleet(4, &[1, 2, 3]);
        assert_eq!(f.call(A, s(1)).unwrap(), CallOutcome::AlreadyThere);
        assert!(f.calls().is_empty());
        assert_eq!(f.status().next_command_id, CommandId::FIRST);
    }

    #[test]
    fn call_issues_innermost_hop_of_the_chain() {
        let mut f = fleet(4, &[1, 2, 3]);
        let CallOutcome::Queued { call, issued } = f.call(A, s(4)).unwrap() else {
            panic!("call was not queued");
        };
        assert_eq!(call.target, s(4));
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].vehicle, C);
        assert_eq!(issued[0].id, CommandId(1));
        assert_eq!(issued[0].reason, MoveReason::MakingSpace);
        assert_eq!(f.vehicle_status(C), VehicleStatus::Moving);
        assert_eq!(f.vehicle_status(A), VehicleStatus::Idle);
    }

    #[test]
    fn duplicate_call_is_a_conflict() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let err = f.call(A, s(3)).unwrap_err();
        assert_eq!(err, FleetError::DuplicateCall { vehicle: A, target: s(4) });
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let pending = f.pending_calls();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].target_station, s(4));
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let mut f = fleet(4, &[1, 2, 3]);
        let err = f.call(A, s(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = f.call(A, s(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(f.calls().is_empty());
    }

    #[test]
    fn unknown_vehicle_call_is_rejected() {
        let mut f = fleet(4, &[1, 2, 3]);
        assert_eq!(f.call(VehicleId(3), s(4)).unwrap_err(), FleetError::UnknownVehicle(VehicleId(3)));
    }

    #[test]
    fn moving_vehicle_call_to_its_start_is_queued() {
        let mut f = fleet(4, &[1, 2]);
        f.call(A, s(3)).unwrap();
        // B makes space for A and is now moving away from 2.
        assert_eq!(f.vehicle_status(B), VehicleStatus::Moving);
        let outcome = f.call(B, s(2)).unwrap();
        assert!(matches!(outcome, CallOutcome::Queued { .. }));
        assert_eq!(f.calls().len(), 2);

        drive(&mut f, 50);
        assert!(f.calls().is_empty());
        assert_eq!(f.track().station_of(A), Some(s(3)));
        assert_eq!(f.track().station_of(B), Some(s(2)));
    }

    #[test]
    fn sequences_list_the_remaining_path() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let seqs = f.sequences().unwrap();
        assert_eq!(seqs[0].sequence, vec![s(2), s(3), s(4)]);
        assert!(seqs[1].sequence.is_empty());
        assert_eq!(seqs[0].name, "v0");
    }
}

// ── Commands and reports ──────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn idle_vehicle_polls_a_stop_at_its_station() {
        let f = fleet(4, &[1, 2, 3]);
        let ticket = f.command(B).unwrap();
        assert_eq!(ticket.action, Action::Stop);
        assert_eq!(ticket.command_id, CommandId::NONE);
        assert_eq!(ticket.expected_station, s(2));
    }

    #[test]
    fn polling_is_idempotent() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let first = f.command(C).unwrap();
        let second = f.command(C).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.action, Action::Forward { expected: s(4) });
        assert_eq!(f.status().next_command_id, CommandId(2));
    }

    #[test]
    fn stop_after_arrival_carries_the_last_id() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(2)).unwrap();
        let (id, at) = poll_forward(&f, A);
        f.report(A, &Report::arrived(id, at)).unwrap();
        let ticket = f.command(A).unwrap();
        assert_eq!(ticket.action, Action::Stop);
        assert_eq!(ticket.command_id, id);
        assert_eq!(ticket.expected_station, s(2));
    }

    #[test]
    fn three_on_four_reaches_the_target() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let hops = drive(&mut f, 20);
        assert_eq!(
            hops,
            vec![
                (C, 3, 4),
                (B, 2, 3),
                (A, 1, 2),
                (C, 4, 1),
                (B, 3, 4),
                (A, 2, 3),
                (C, 1, 2),
                (B, 4, 1),
                (A, 3, 4),
            ]
        );
        assert!(f.is_settled());
        assert_eq!(f.status().next_command_id, CommandId(10));

        // Blockers make space, only the called vehicle moves to its target.
        let ms = MoveReason::MakingSpace;
        let mt = MoveReason::MovingToTarget;
        let issued: Vec<_> = f
            .observer()
            .issued
            .iter()
            .map(|c| (c.vehicle, c.from.get(), c.expected().get(), c.reason))
            .collect();
        assert_eq!(
            issued,
            vec![
                (C, 3, 4, ms),
                (B, 2, 3, ms),
                (A, 1, 2, mt),
                (C, 4, 1, ms),
                (B, 3, 4, ms),
                (A, 2, 3, mt),
                (C, 1, 2, ms),
                (B, 4, 1, ms),
                (A, 3, 4, mt),
            ]
        );
        assert!(
            f.observer()
                .events
                .iter()
                .any(|e| e == &format!("resolved {A} {}", s(4)))
        );
    }

    #[test]
    fn dashboard_preview_matches_execution() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let plan: Vec<_> = f
            .dashboard()
            .unwrap()
            .movement_plan
            .iter()
            .map(|p| (p.vehicle, p.from_station.get(), p.to_station.get()))
            .collect();
        let before = f.status();
        let hops = drive(&mut f, 20);
        assert_eq!(plan, hops);
        assert_ne!(before, f.status());
    }

    #[test]
    fn dashboard_respects_the_preview_limit() {
        let mut cfg = config(4, &["a", "b", "c"]);
        cfg.preview_steps = 3;
        let mut f = Fleet::new(cfg).unwrap();
        f.initialize(&[(A, s(1)), (B, s(2)), (C, s(3))]).unwrap();
        f.call(A, s(4)).unwrap();
        assert_eq!(f.dashboard().unwrap().movement_plan.len(), 3);
    }

    #[test]
    fn duplicate_report_mutates_once() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(2)).unwrap();
        let (id, at) = poll_forward(&f, A);
        let first = f.report(A, &Report::arrived(id, at)).unwrap();
        assert!(first.mutated());
        let after_first = f.status();

        let second = f.report(A, &Report::arrived(id, at)).unwrap();
        assert_eq!(second, ReportOutcome::Stale { vehicle: A, command_id: id, outstanding: None });
        assert!(!second.mutated());
        assert_eq!(f.status(), after_first);
        assert!(f.observer().events.contains(&format!("stale {A} {id}")));
    }

    #[test]
    fn never_issued_id_is_rejected() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(2)).unwrap();
        for id in [CommandId::NONE, CommandId(99)] {
            let err = f.report(A, &Report::arrived(id, s(2))).unwrap_err();
            assert_eq!(err, FleetError::UnknownCommand { vehicle: A, command_id: id });
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(f.vehicle_status(A), VehicleStatus::Moving);
    }

    #[test]
    fn another_vehicles_command_is_stale() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let (id, at) = poll_forward(&f, C);
        let outcome = f.report(A, &Report::arrived(id, at)).unwrap();
        assert!(!outcome.mutated());
        assert_eq!(f.track().station_of(C), Some(s(3)));
    }

    #[test]
    fn error_report_aborts_and_reissues() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(2)).unwrap();
        let (id, at) = poll_forward(&f, A);
        let report = Report { event: ReportEvent::Error, ..Report::arrived(id, at) };
        let ReportOutcome::Aborted { station, issued, .. } = f.report(A, &report).unwrap() else {
            panic!("expected an abort");
        };
        assert_eq!(station, s(1));
        assert_eq!(f.track().station_of(A), Some(s(1)));
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].id, CommandId(2));
        assert!(f.observer().events.contains(&format!("failed {id}")));

        // The aborted command is superseded.
        let stale = f.report(A, &Report::arrived(id, at)).unwrap();
        assert_eq!(
            stale,
            ReportOutcome::Stale { vehicle: A, command_id: id, outstanding: Some(CommandId(2)) }
        );
    }
}

// ── Detector reconciliation ───────────────────────────────────────────────────

#[cfg(test)]
mod mismatch_tests {
    use super::*;

    fn detected(id: CommandId, expected: u32, detected: u32, confident: bool) -> Report {
        Report {
            command_id:        id,
            event:             ReportEvent::Arrived,
            expected_station:  s(expected),
            detected_station:  s(detected),
            pattern_confident: confident,
            mismatch:          expected != detected,
        }
    }

    #[test]
    fn confirm_prefers_a_confident_detector() {
        let c = confirm_station(s(2), &detected(CommandId(1), 2, 3, true));
        assert_eq!(c.station, s(3));
        assert_eq!(c.divergence, Some(Divergence { expected: s(2), detected: s(3) }));

        let c = confirm_station(s(2), &detected(CommandId(1), 2, 3, false));
        assert_eq!(c.station, s(2));
        assert_eq!(c.divergence, None);
    }

    #[test]
    fn confident_detector_corrects_the_position() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(4)).unwrap();
        let (id, at) = poll_forward(&f, A);
        assert_eq!(at, s(2));

        let outcome = f.report(A, &detected(id, 2, 3, true)).unwrap();
        let ReportOutcome::Arrived { to, divergence, .. } = outcome else {
            panic!("expected arrival");
        };
        assert_eq!(to, s(3));
        assert!(divergence.is_some());
        assert_eq!(f.track().station_of(A), Some(s(3)));
        assert!(f.track().is_free(s(2)));

        // Planning continues from the corrected station.
        let (_, next) = poll_forward(&f, A);
        assert_eq!(next, s(4));
        assert!(f.dispatcher().outstanding(A).is_some_and(|c| c.from == s(3)));
        assert!(f.observer().events.contains(&format!("diverge {A} {}/{}", s(2), s(3))));
    }

    #[test]
    fn unsure_detector_is_ignored() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(4)).unwrap();
        let (id, _) = poll_forward(&f, A);
        f.report(A, &detected(id, 2, 3, false)).unwrap();
        assert_eq!(f.track().station_of(A), Some(s(2)));
        assert_eq!(poll_forward(&f, A).1, s(3));
    }

    #[test]
    fn correction_into_an_occupied_station_is_rejected() {
        let mut f = fleet(4, &[1, 3]);
        f.call(A, s(2)).unwrap();
        let (id, _) = poll_forward(&f, A);
        let before = f.status();

        let err = f.report(A, &detected(id, 2, 3, true)).unwrap_err();
        assert_eq!(err, FleetError::StationOccupied { station: s(3), occupant: B });
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(f.status(), before);

        // The device can still confirm the real arrival.
        assert!(f.report(A, &detected(id, 2, 2, true)).unwrap().mutated());
        assert_eq!(f.track().station_of(A), Some(s(2)));
    }

    #[test]
    fn correction_into_a_reserved_station_is_rejected() {
        let mut f = fleet(5, &[1, 3]);
        f.call(A, s(2)).unwrap();
        f.call(B, s(4)).unwrap();
        let (a_id, a_at) = poll_forward(&f, A);
        let (b_id, _) = poll_forward(&f, B);
        assert_eq!(a_at, s(2));
        let before = f.status();

        // B's detector claims the station A is on its way to.
        let err = f.report(B, &detected(b_id, 4, 2, true)).unwrap_err();
        assert_eq!(err, FleetError::StationReserved { station: s(2), heading: A });
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(f.status(), before);
        assert!(f.dashboard().is_ok());

        // A still lands, and B can confirm honestly afterwards.
        assert!(f.report(A, &Report::arrived(a_id, a_at)).unwrap().mutated());
        assert!(f.report(B, &detected(b_id, 4, 4, true)).unwrap().mutated());
        assert!(f.is_settled());
        assert_eq!(f.track().station_of(A), Some(s(2)));
        assert_eq!(f.track().station_of(B), Some(s(4)));
    }

    #[test]
    fn out_of_range_detection_is_rejected() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(2)).unwrap();
        let (id, _) = poll_forward(&f, A);
        let err = f.report(A, &detected(id, 2, 9, true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(f.vehicle_status(A), VehicleStatus::Moving);
    }
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reset_tests {
    use super::*;

    #[test]
    fn reset_clears_state_but_not_the_id_counter() {
        let mut f = fleet(4, &[1, 2, 3]);
        f.call(A, s(4)).unwrap();
        let (old, at) = poll_forward(&f, C);
        f.reset();

        assert!(!f.is_initialized());
        assert!(f.calls().is_empty());
        assert_eq!(f.command(A).unwrap_err(), FleetError::Uninitialized);
        assert_eq!(f.observer().events.last().map(String::as_str), Some("reset"));

        f.initialize(&[(A, s(1)), (B, s(2)), (C, s(3))]).unwrap();
        assert_eq!(f.status().next_command_id, CommandId(2));
        assert_eq!(f.command(C).unwrap().command_id, CommandId::NONE);

        // A device still holding a pre-reset command gets nowhere.
        let outcome = f.report(C, &Report::arrived(old, at)).unwrap();
        assert!(!outcome.mutated());
        assert_eq!(f.track().station_of(C), Some(s(3)));
    }
}

// ── Observer and sharing ──────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn noop_observer_fleet_runs() {
        let mut f = Fleet::with_observer(config(5, &["a", "b"]), NoopObserver).unwrap();
        f.initialize(&[(A, s(1)), (B, s(2))]).unwrap();
        f.call(B, s(1)).unwrap();
        drive(&mut f, 50);
        assert_eq!(f.track().station_of(B), Some(s(1)));
    }

    #[test]
    fn events_arrive_in_order() {
        let mut f = fleet(4, &[1]);
        f.call(A, s(2)).unwrap();
        drive(&mut f, 5);
        assert_eq!(
            f.observer().events,
            vec![
                format!("issue {} {A}", CommandId(1)),
                format!("arrive {A} {}->{}", s(1), s(2)),
                format!("resolved {A} {}", s(2)),
            ]
        );
    }
}

#[cfg(test)]
mod shared_tests {
    use super::*;

    #[test]
    fn concurrent_calls_all_converge() {
        let cfg = config(6, &["a", "b", "c"]);
        let fleet = Fleet::with_observer(cfg, RecordingObserver::default()).unwrap();
        let shared = Arc::new(SharedFleet::from_fleet(fleet));
        shared.initialize(&[(A, s(1)), (B, s(2)), (C, s(3))]).unwrap();

        let handles: Vec<_> = [(A, 5), (B, 6), (C, 4)]
            .into_iter()
            .map(|(v, t)| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || shared.call(v, s(t)).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut f = Arc::try_unwrap(shared).ok().unwrap().into_inner().unwrap();
        assert_eq!(f.calls().len(), 3);
        drive(&mut f, 500);
        assert!(f.calls().is_empty());
        let resolved = f.observer().events.iter().filter(|e| e.starts_with("resolved")).count();
        assert_eq!(resolved, 3);
    }

    #[test]
    fn readers_see_consistent_snapshots() {
        let shared = Arc::new(SharedFleet::new(config(4, &["a", "b", "c"])).unwrap());
        shared.initialize(&[(A, s(1)), (B, s(2)), (C, s(3))]).unwrap();
        shared.call(A, s(4)).unwrap();

        let reader = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..100 {
                    let status = shared.status().unwrap();
                    let occupied = status.stations.iter().filter(|st| st.occupied_by.is_some()).count();
                    assert_eq!(occupied, 3);
                }
            })
        };

        for _ in 0..20 {
            for v in [A, B, C] {
                let ticket = shared.command(v).unwrap();
                if ticket.action.is_forward() {
                    shared
                        .report(v, &Report::arrived(ticket.command_id, ticket.expected_station))
                        .unwrap();
                }
            }
        }
        reader.join().unwrap();

        assert_eq!(shared.positions().unwrap()[0].station, s(4));
        assert!(shared.health().unwrap().initialized);
    }
}
