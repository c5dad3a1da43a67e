//! Battery-pack monitor simulator entry point: CLI wiring and the tick loop.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bms_sim::bms::{Bms, TickReport, TracingSink};
use bms_sim::cli::Args;
use bms_sim::error::{Error, Result};
use bms_sim::io::export::export_csv;
use bms_sim::sensor::SensorSimulator;
use bms_sim::sim::clock::Clock;
use bms_sim::sim::kpi::RunSummary;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bms_sim=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            for line in e.to_string().lines() {
                error!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let scenario = args.load_scenario()?;
    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(Error::Config(errors));
    }

    let sim = &scenario.simulation;
    info!(
        cells = sim.cells,
        ticks = sim.ticks,
        seed = sim.seed,
        tick_interval_ms = sim.tick_interval_ms,
        "Starting battery monitor"
    );

    let source = SensorSimulator::new(scenario.sensor.clone(), scenario.limits, sim.seed);
    let mut bms = Bms::from_config(&scenario, source, TracingSink);

    let total = (sim.ticks > 0).then_some(sim.ticks);
    let mut clock = Clock::new(total, sim.tick_interval_ms).realtime(sim.realtime);
    let dt_s = clock.dt_s();

    let Some(ticks) = total else {
        if args.telemetry_out.is_some() {
            warn!("Unbounded run, telemetry export skipped");
        }
        clock.run(|_| {
            bms.tick(dt_s);
        });
        return Ok(());
    };

    let mut reports: Vec<TickReport> = Vec::with_capacity(ticks);
    clock.run(|_| reports.push(bms.tick(dt_s)));

    println!("\n{}", RunSummary::from_reports(&reports));

    if let Some(ref path) = args.telemetry_out {
        export_csv(&reports, path)?;
        info!(path = %path.display(), "Telemetry written");
    }

    Ok(())
}
