use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::types::MeasurementSource;
use crate::bms::limits::SafetyLimits;
use crate::config::SensorConfig;

/// Magnitude by which an extreme voltage reading overshoots the fault limit (V).
const SENSOR_ERROR_VOLTAGE_MARGIN_V: f32 = 0.1;
/// Magnitude by which an extreme temperature reading overshoots the fault limit (C).
const SENSOR_ERROR_TEMPERATURE_MARGIN_C: f32 = 1.0;
/// Pack currents reported by a failed current sensor (A).
const SENSOR_ERROR_DISCHARGE_A: f32 = -50.0;
const SENSOR_ERROR_CHARGE_A: f32 = 10.0;

/// Kind of reading produced when a fault is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Injection {
    CriticalLow,
    CriticalHigh,
    SensorError,
}

/// Random measurement source standing in for pack hardware.
///
/// Readings are uniform within the configured ranges. With probability
/// `fault_probability` per reading a fault is injected instead: a value past
/// the rated low or high extreme, or a sensor-error value outside the fault
/// limits (a third each).
#[derive(Debug, Clone)]
pub struct SensorSimulator {
    config: SensorConfig,
    limits: SafetyLimits,
    rng: StdRng,
}

impl SensorSimulator {
    /// Creates a simulator seeded for reproducible readings.
    ///
    /// # Arguments
    ///
    /// * `config` - Reading ranges and fault probability
    /// * `limits` - Thresholds used to place injected faults
    /// * `seed` - Random seed
    pub fn new(config: SensorConfig, limits: SafetyLimits, seed: u64) -> Self {
        Self {
            config,
            limits,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn injection(&mut self) -> Option<Injection> {
        if self.rng.random::<f32>() >= self.config.fault_probability {
            return None;
        }
        let pick = self.rng.random::<f32>();
        Some(if pick < 0.33 {
            Injection::CriticalLow
        } else if pick < 0.66 {
            Injection::CriticalHigh
        } else {
            Injection::SensorError
        })
    }

    fn coin(&mut self) -> bool {
        self.rng.random::<f32>() < 0.5
    }
}

impl MeasurementSource for SensorSimulator {
    fn read_voltage(&mut self, cell_id: usize) -> f32 {
        let nominal = self
            .rng
            .random_range(self.config.voltage_min_v..=self.config.voltage_max_v);
        let band = self.limits.voltage;

        match self.injection() {
            None => nominal,
            Some(Injection::CriticalLow) => {
                debug!(cell = cell_id, "Injected low voltage reading");
                band.critical_min - self.rng.random::<f32>() * 0.2
            }
            Some(Injection::CriticalHigh) => {
                debug!(cell = cell_id, "Injected high voltage reading");
                band.critical_max + self.rng.random::<f32>() * 0.2
            }
            Some(Injection::SensorError) => {
                debug!(cell = cell_id, "Injected voltage sensor error");
                if self.coin() {
                    band.fault_min - SENSOR_ERROR_VOLTAGE_MARGIN_V
                } else {
                    band.fault_max + SENSOR_ERROR_VOLTAGE_MARGIN_V
                }
            }
        }
    }

    fn read_temperature(&mut self, cell_id: usize) -> f32 {
        let nominal = self
            .rng
            .random_range(self.config.temperature_min_c..=self.config.temperature_max_c);
        let band = self.limits.temperature;

        match self.injection() {
            None => nominal,
            Some(Injection::CriticalLow) => {
                debug!(cell = cell_id, "Injected low temperature reading");
                band.critical_min - self.rng.random::<f32>() * 5.0
            }
            Some(Injection::CriticalHigh) => {
                debug!(cell = cell_id, "Injected high temperature reading");
                band.critical_max + self.rng.random::<f32>() * 5.0
            }
            Some(Injection::SensorError) => {
                debug!(cell = cell_id, "Injected temperature sensor error");
                if self.coin() {
                    band.fault_min - SENSOR_ERROR_TEMPERATURE_MARGIN_C
                } else {
                    band.fault_max + SENSOR_ERROR_TEMPERATURE_MARGIN_C
                }
            }
        }
    }

    fn read_current(&mut self) -> f32 {
        let nominal = self
            .rng
            .random_range(self.config.current_min_a..=self.config.current_max_a);
        let limits = self.limits.current;

        match self.injection() {
            None => nominal,
            Some(Injection::CriticalLow) => {
                debug!("Injected high discharge current");
                -(limits.discharge_critical_max_a + self.rng.random::<f32>() * 5.0)
            }
            Some(Injection::CriticalHigh) => {
                debug!("Injected high charge current");
                limits.charge_critical_max_a + self.rng.random::<f32>()
            }
            Some(Injection::SensorError) => {
                debug!("Injected current sensor error");
                if self.coin() {
                    SENSOR_ERROR_DISCHARGE_A
                } else {
                    SENSOR_ERROR_CHARGE_A
                }
            }
        }
    }
}
