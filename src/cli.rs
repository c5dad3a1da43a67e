//! Command-line arguments and scenario overrides for the simulator binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ScenarioConfig;
use crate::error::Result;

/// Battery-pack monitor simulator.
///
/// Without `--config` or `--preset` the baseline preset is used.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load the scenario from a TOML file.
    #[clap(long, value_name = "PATH", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (baseline, nominal, stress).
    #[clap(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the sensor simulator seed.
    #[clap(long, env = "BMS_SIM_SEED")]
    pub seed: Option<u64>,

    /// Override the number of ticks; 0 runs until interrupted.
    #[clap(long)]
    pub ticks: Option<usize>,

    /// Sleep for the tick interval between ticks.
    #[clap(long)]
    pub realtime: bool,

    /// Export tick reports to CSV.
    #[clap(long, value_name = "PATH")]
    pub telemetry_out: Option<PathBuf>,
}

impl Args {
    /// Resolves the scenario source and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or preset cannot be loaded.
    pub fn load_scenario(&self) -> Result<ScenarioConfig> {
        let mut scenario = match (&self.config, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::baseline(),
        };
        self.apply_overrides(&mut scenario);
        Ok(scenario)
    }

    fn apply_overrides(&self, scenario: &mut ScenarioConfig) {
        if let Some(seed) = self.seed {
            scenario.simulation.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            scenario.simulation.ticks = ticks;
        }
        if self.realtime {
            scenario.simulation.realtime = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("bms-sim").chain(args.iter().copied()))
    }

    #[test]
    fn no_arguments_uses_baseline() {
        let args = parse(&[]).expect("empty args");
        let scenario = args.load_scenario().expect("baseline");
        assert_eq!(scenario, ScenarioConfig::baseline());
    }

    #[test]
    fn preset_with_overrides() {
        let args = parse(&["--preset", "stress", "--seed", "7", "--ticks", "0", "--realtime"])
            .expect("valid args");
        let scenario = args.load_scenario().expect("stress preset");
        assert_eq!(scenario.simulation.seed, 7);
        assert_eq!(scenario.simulation.ticks, 0);
        assert!(scenario.simulation.realtime);
        assert_eq!(scenario.pack, ScenarioConfig::stress().pack);
    }

    #[test]
    fn config_and_preset_conflict() {
        assert!(parse(&["--config", "a.toml", "--preset", "nominal"]).is_err());
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let args = parse(&["--preset", "unknown"]).expect("parses");
        assert!(args.load_scenario().is_err());
    }

    #[test]
    fn seed_must_be_numeric() {
        assert!(parse(&["--seed", "abc"]).is_err());
    }

    #[test]
    fn telemetry_path_is_kept() {
        let args = parse(&["--telemetry-out", "out.csv"]).expect("valid args");
        assert_eq!(args.telemetry_out, Some(PathBuf::from("out.csv")));
    }
}
