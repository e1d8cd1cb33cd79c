//! shuttle — drives simulated loop vehicles against a ringline fleet.
//!
//! Places the configured vehicles, submits the requested calls, then runs
//! one device thread per vehicle.  Each device polls its command, executes
//! forward moves instantly, and reports arrival through a detector that can
//! be made to misread with `--mismatch-rate`.
//!
//! ```text
//! shuttle --position a=1 --position b=2 --position c=3 --call a=4 --dashboard
//! ```
//!
//! Logging is controlled by `RINGLINE_LOG` (default `info`).

mod device;
mod trace;

use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use rl_core::{LoopConfig, StationId, VehicleId};
use rl_fleet::{CallOutcome, SharedFleet};

use device::{Device, HopRecord};
use trace::TraceWriter;

// ── Constants ─────────────────────────────────────────────────────────────────

const POLL_INTERVAL: Duration = Duration::from_millis(1);

// ── Command line ──────────────────────────────────────────────────────────────

/// `name=station`, as given to `--position` and `--call`.
#[derive(Clone, Debug)]
struct Assignment {
    name:    String,
    station: u32,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, station) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=STATION, got {s:?}"))?;
        let station = station
            .trim()
            .parse()
            .map_err(|_| format!("station in {s:?} is not a number"))?;
        Ok(Self { name: name.trim().to_string(), station })
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Run simulated vehicles on a ringline loop")]
struct Cli {
    #[arg(long, help = "JSON loop config (station_count, vehicle_names, preview_steps).")]
    config: Option<PathBuf>,

    #[arg(
        long = "position",
        value_name = "NAME=STATION",
        help = "Initial station of a vehicle. Defaults to vehicle i at station i+1."
    )]
    positions: Vec<Assignment>,

    #[arg(long = "call", value_name = "NAME=STATION", help = "Call a vehicle to a station.")]
    calls: Vec<Assignment>,

    #[arg(long, default_value_t = 0.0, help = "Probability that a detector misreads.")]
    mismatch_rate: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 1000, help = "Polls per device before giving up.")]
    max_rounds: usize,

    #[arg(long, help = "Directory to write hops.csv into.")]
    trace: Option<PathBuf>,

    #[arg(long, help = "Print the dashboard (with its movement plan) as JSON after the calls.")]
    dashboard: bool,
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&PathBuf>) -> Result<LoopConfig> {
    let Some(path) = path else {
        return Ok(LoopConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config: LoopConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn initial_positions(
    fleet:     &SharedFleet,
    config:    &LoopConfig,
    requested: &[Assignment],
) -> Result<Vec<(VehicleId, StationId)>> {
    if requested.is_empty() {
        return Ok(config
            .vehicles()
            .map(|v| (v, StationId(v.get() + 1)))
            .collect());
    }
    requested
        .iter()
        .map(|a| -> Result<_> { Ok((fleet.vehicle_id(&a.name)?, StationId(a.station))) })
        .collect()
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// Spawn one device thread per vehicle and collect confirmed hops until every
/// device has stopped.
fn run_devices(
    fleet:  &Arc<SharedFleet>,
    config: &LoopConfig,
    cli:    &Cli,
    mut on_hop: impl FnMut(&HopRecord) -> Result<()>,
) -> Result<usize> {
    let (tx, rx) = mpsc::channel::<HopRecord>();
    let mut handles = Vec::new();

    for vehicle in config.vehicles() {
        let mut device = Device::new(
            vehicle,
            config.vehicle_name(vehicle).to_string(),
            config.station_count,
            cli.mismatch_rate,
            cli.seed,
        );
        let fleet = Arc::clone(fleet);
        let tx = tx.clone();
        let max_rounds = cli.max_rounds;
        handles.push(thread::spawn(move || -> Result<()> {
            for _ in 0..max_rounds {
                if let Some(hop) = device.step(&*fleet)? {
                    // The receiver only goes away if the main thread failed.
                    if tx.send(hop).is_err() {
                        break;
                    }
                }
                if fleet.is_settled()? {
                    return Ok(());
                }
                thread::sleep(POLL_INTERVAL);
            }
            warn!("device {} gave up after {max_rounds} polls", device.name());
            Ok(())
        }));
    }
    drop(tx);

    let mut hops = 0;
    for hop in rx {
        hops += 1;
        on_hop(&hop)?;
    }
    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => bail!("device thread panicked"),
        }
    }
    Ok(hops)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("RINGLINE_LOG", "info")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    info!(
        "loop of {} stations, vehicles {:?}",
        config.station_count, config.vehicle_names
    );
    let fleet = Arc::new(SharedFleet::new(config.clone())?);

    let positions = initial_positions(&fleet, &config, &cli.positions)?;
    fleet.initialize(&positions)?;

    for call in &cli.calls {
        let vehicle = fleet.vehicle_id(&call.name)?;
        match fleet.call(vehicle, StationId(call.station))? {
            CallOutcome::AlreadyThere => info!("{} is already at {}", call.name, call.station),
            CallOutcome::Queued { issued, .. } => {
                info!("{} called to {} ({} command(s) issued)", call.name, call.station, issued.len())
            }
        }
    }

    if cli.dashboard {
        let dashboard = fleet.dashboard()?;
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    }

    let mut trace = cli.trace.as_deref().map(TraceWriter::new).transpose()?;
    let hops = run_devices(&fleet, &config, &cli, |hop| {
        if let Some(t) = trace.as_mut() {
            t.write(hop)?;
        }
        Ok(())
    })?;
    if let Some(t) = trace.as_mut() {
        t.finish()?;
        info!("wrote {} hop rows", t.rows());
    }

    if !fleet.is_settled()? {
        warn!("stopped with work outstanding");
    }
    info!("{hops} hops confirmed");
    for p in fleet.positions()? {
        info!("  {:<8} at {}", p.name, p.station);
    }
    Ok(())
}
