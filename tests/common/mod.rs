//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use bms_sim::bms::{Bms, Notification};
use bms_sim::config::ScenarioConfig;
use bms_sim::sensor::{FixedSource, SensorSimulator};

/// One-second tick, as used by the default scenario.
pub const DT_S: f32 = 1.0;

/// Healthy pack reading: 4 cells at 3.7 V and 25 C, drawing no current.
pub fn healthy_source() -> FixedSource {
    FixedSource::uniform(4, 3.7, 25.0, 0.0)
}

/// Monitor over a fixed source with a recording sink and baseline config.
pub fn fixed_monitor(source: FixedSource) -> Bms<FixedSource, Vec<Notification>> {
    Bms::from_config(&ScenarioConfig::baseline(), source, Vec::new())
}

/// Monitor over a fixed source with a recording sink and the given config.
pub fn fixed_monitor_with(
    config: &ScenarioConfig,
    source: FixedSource,
) -> Bms<FixedSource, Vec<Notification>> {
    Bms::from_config(config, source, Vec::new())
}

/// Monitor driven by the seeded sensor simulator.
pub fn simulated_monitor(config: &ScenarioConfig) -> Bms<SensorSimulator, Vec<Notification>> {
    let source = SensorSimulator::new(
        config.sensor.clone(),
        config.limits,
        config.simulation.seed,
    );
    Bms::from_config(config, source, Vec::new())
}
