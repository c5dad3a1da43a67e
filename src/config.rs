//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::bms::limits::{Band, SafetyLimits};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the reference pack. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`].
/// The configuration is read once and never changes during a run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Tick loop parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Pack capacity and estimator parameters.
    #[serde(default)]
    pub pack: PackConfig,
    /// Classification thresholds.
    #[serde(default)]
    pub limits: SafetyLimits,
    /// Sensor simulator parameters.
    #[serde(default)]
    pub sensor: SensorConfig,
}

/// Tick loop parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of cells in the pack (must be > 0).
    pub cells: usize,
    /// Number of ticks to run; 0 runs until interrupted.
    pub ticks: usize,
    /// Interval between ticks (ms, must be > 0).
    pub tick_interval_ms: u64,
    /// Sensor simulator seed.
    pub seed: u64,
    /// Sleep for the tick interval between ticks.
    pub realtime: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cells: 4,
            ticks: 60,
            tick_interval_ms: 1000,
            seed: 42,
            realtime: false,
        }
    }
}

impl SimulationConfig {
    /// Tick interval in seconds, as fed to the charge estimator.
    pub fn dt_s(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }
}

/// Pack capacity and estimator parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Nominal capacity (mAh).
    pub nominal_capacity_mah: f32,
    /// State of charge the coulomb counter starts from (%).
    pub initial_soc_percent: f32,
    /// Fraction of charging current that is stored (0..1.0].
    pub charge_efficiency: f32,
    /// SoC at or above which the pack counts as full (%).
    pub soc_full_threshold_percent: f32,
    /// SoC at or below which the pack counts as empty (%).
    pub soc_empty_threshold_percent: f32,
    /// SoH lost per counted cycle (%).
    pub degradation_per_cycle_percent: f32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            nominal_capacity_mah: 3000.0,
            initial_soc_percent: 50.0,
            charge_efficiency: 0.98,
            soc_full_threshold_percent: 98.0,
            soc_empty_threshold_percent: 10.0,
            degradation_per_cycle_percent: 0.1,
        }
    }
}

/// Sensor simulator ranges and fault injection rate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    pub voltage_min_v: f32,
    pub voltage_max_v: f32,
    pub temperature_min_c: f32,
    pub temperature_max_c: f32,
    pub current_min_a: f32,
    pub current_max_a: f32,
    /// Probability (0.0-1.0) that a single reading is replaced by a fault.
    pub fault_probability: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            voltage_min_v: 2.00,
            voltage_max_v: 4.60,
            temperature_min_c: -15.0,
            temperature_max_c: 65.0,
            current_min_a: -25.0,
            current_max_a: 5.0,
            fault_probability: 0.02,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"pack.charge_efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "nominal", "stress"];

    /// Returns the baseline scenario: reference thresholds and the wide,
    /// noisy sensor ranges of the bench simulator.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns a quiet scenario whose sensors stay inside the normal bands.
    pub fn nominal() -> Self {
        Self {
            sensor: SensorConfig {
                voltage_min_v: 3.30,
                voltage_max_v: 4.10,
                temperature_min_c: 15.0,
                temperature_max_c: 35.0,
                current_min_a: -8.0,
                current_max_a: 1.5,
                fault_probability: 0.0,
            },
            ..Self::default()
        }
    }

    /// Returns the stress scenario: frequent fault injection and a small pack
    /// that cycles quickly.
    pub fn stress() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 600,
                ..SimulationConfig::default()
            },
            pack: PackConfig {
                nominal_capacity_mah: 50.0,
                degradation_per_cycle_percent: 2.0,
                ..PackConfig::default()
            },
            sensor: SensorConfig {
                current_min_a: -12.0,
                current_max_a: 12.0,
                fault_probability: 0.2,
                ..SensorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "nominal" => Ok(Self::nominal()),
            "stress" => Ok(Self::stress()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.cells == 0 {
            errors.push(ConfigError::new("simulation.cells", "must be > 0"));
        }
        if s.tick_interval_ms == 0 {
            errors.push(ConfigError::new("simulation.tick_interval_ms", "must be > 0"));
        }

        let p = &self.pack;
        if !(p.nominal_capacity_mah > 0.0) {
            errors.push(ConfigError::new("pack.nominal_capacity_mah", "must be > 0"));
        }
        if !(p.charge_efficiency > 0.0 && p.charge_efficiency <= 1.0) {
            errors.push(ConfigError::new("pack.charge_efficiency", "must be in (0.0, 1.0]"));
        }
        for (field, value) in [
            ("pack.initial_soc_percent", p.initial_soc_percent),
            ("pack.soc_full_threshold_percent", p.soc_full_threshold_percent),
            ("pack.soc_empty_threshold_percent", p.soc_empty_threshold_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0, 100]"));
            }
        }
        if p.soc_empty_threshold_percent >= p.soc_full_threshold_percent {
            errors.push(ConfigError::new(
                "pack.soc_empty_threshold_percent",
                "must be < pack.soc_full_threshold_percent",
            ));
        }
        if !(p.degradation_per_cycle_percent >= 0.0) {
            errors.push(ConfigError::new(
                "pack.degradation_per_cycle_percent",
                "must be >= 0",
            ));
        }

        let l = &self.limits;
        check_band("limits.voltage", &l.voltage, &mut errors);
        check_band("limits.temperature", &l.temperature, &mut errors);

        let c = &l.current;
        if !(c.idle_a >= 0.0) {
            errors.push(ConfigError::new("limits.current.idle_a", "must be >= 0"));
        }
        let charge = [
            c.idle_a,
            c.charge_normal_max_a,
            c.charge_warning_max_a,
            c.charge_critical_max_a,
        ];
        if !is_ascending(&charge) {
            errors.push(ConfigError::new(
                "limits.current.charge_normal_max_a",
                "charge limits must ascend: idle <= normal <= warning <= critical",
            ));
        }
        let discharge = [
            c.idle_a,
            c.discharge_normal_max_a,
            c.discharge_warning_max_a,
            c.discharge_critical_max_a,
        ];
        if !is_ascending(&discharge) {
            errors.push(ConfigError::new(
                "limits.current.discharge_normal_max_a",
                "discharge limits must ascend: idle <= normal <= warning <= critical",
            ));
        }

        for (field, value, idle_a) in [
            ("limits.current.charge_normal_max_a", c.charge_normal_max_a, c.idle_a),
            ("limits.current.discharge_normal_max_a", c.discharge_normal_max_a, c.idle_a),
        ] {
            if !(value > idle_a) {
                errors.push(ConfigError::new(field, "must be > limits.current.idle_a"));
            }
        }

        let soh = &l.soh;
        for (field, value) in [
            ("limits.soh.warning_percent", soh.warning_percent),
            ("limits.soh.critical_percent", soh.critical_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0, 100]"));
            }
        }
        if !(soh.critical_percent <= soh.warning_percent) {
            errors.push(ConfigError::new(
                "limits.soh.critical_percent",
                "must be <= limits.soh.warning_percent",
            ));
        }

        let sensor = &self.sensor;
        for (field, lo, hi) in [
            ("sensor.voltage_min_v", sensor.voltage_min_v, sensor.voltage_max_v),
            (
                "sensor.temperature_min_c",
                sensor.temperature_min_c,
                sensor.temperature_max_c,
            ),
            ("sensor.current_min_a", sensor.current_min_a, sensor.current_max_a),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                errors.push(ConfigError::new(field, "must be finite and <= the matching max"));
            }
        }
        if !(0.0..=1.0).contains(&sensor.fault_probability) {
            errors.push(ConfigError::new("sensor.fault_probability", "must be in [0.0, 1.0]"));
        }

        errors
    }
}

fn is_ascending(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite()) && values.windows(2).all(|w| w[0] <= w[1])
}

fn check_band(field: &str, band: &Band, errors: &mut Vec<ConfigError>) {
    if !is_ascending(&band.ordered()) {
        errors.push(ConfigError::new(
            field,
            "limits must ascend: fault_min <= critical_min <= warning_min <= normal_min \
             <= normal_max <= warning_max <= critical_max <= fault_max",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn baseline_matches_reference_constants() {
        let cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.simulation.cells, 4);
        assert_eq!(cfg.pack.nominal_capacity_mah, 3000.0);
        assert_eq!(cfg.pack.charge_efficiency, 0.98);
        assert_eq!(cfg.limits.voltage.fault_max, 4.80);
        assert_eq!(cfg.limits.temperature.normal_max, 45.0);
        assert_eq!(cfg.limits.current.discharge_critical_max_a, 20.0);
        assert_eq!(cfg.limits.soh.warning_percent, 80.0);
        assert_eq!(cfg.simulation.dt_s(), 1.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
cells = 6
ticks = 10
tick_interval_ms = 500
seed = 99

[pack]
nominal_capacity_mah = 5000.0
charge_efficiency = 0.95

[limits.voltage]
fault_min = 1.5
critical_min = 2.5
warning_min = 2.8
normal_min = 3.0
normal_max = 4.1
warning_max = 4.2
critical_max = 4.3
fault_max = 4.5

[limits.current]
idle_a = 0.1
charge_normal_max_a = 5.0
charge_warning_max_a = 6.0
charge_critical_max_a = 7.0

[limits.soh]
warning_percent = 85.0

[sensor]
fault_probability = 0.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap_or_default();
        assert_eq!(cfg.simulation.cells, 6);
        assert_eq!(cfg.simulation.dt_s(), 0.5);
        assert_eq!(cfg.pack.nominal_capacity_mah, 5000.0);
        assert_eq!(cfg.limits.voltage.normal_max, 4.1);
        assert_eq!(cfg.limits.current.idle_a, 0.1);
        // untouched sections keep their defaults
        assert_eq!(cfg.limits.current.discharge_normal_max_a, 10.0);
        assert_eq!(cfg.limits.temperature, Band::cell_temperature());
        assert_eq!(cfg.limits.soh.critical_percent, 60.0);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[pack]
nominal_capacity_mah = 3000.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap_or_default();
        assert_eq!(cfg.simulation.seed, 99);
        assert_eq!(cfg.simulation.ticks, 60);
        assert_eq!(cfg.pack, PackConfig::default());
    }

    #[test]
    fn partial_band_keeps_remaining_limits() {
        let cfg = ScenarioConfig::from_toml_str("[limits.voltage]\nnormal_max = 4.15\n")
            .expect("partial band parses");
        assert_eq!(
            cfg.limits.voltage,
            Band {
                normal_max: 4.15,
                ..Band::cell_voltage()
            }
        );
        assert_eq!(cfg.limits.temperature, Band::cell_temperature());
        assert!(cfg.validate().is_empty());

        let cfg = ScenarioConfig::from_toml_str("[limits.temperature]\nfault_min = -30.0\n")
            .expect("partial band parses");
        assert_eq!(cfg.limits.temperature.fault_min, -30.0);
        assert_eq!(cfg.limits.temperature.fault_max, 70.0);
    }

    #[test]
    fn band_rejects_unknown_limit() {
        assert!(ScenarioConfig::from_toml_str("[limits.voltage]\nnominal = 3.7\n").is_err());
    }

    #[test]
    fn validation_catches_soh_limits_out_of_range() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.limits.soh.warning_percent = 150.0;
        cfg.limits.soh.critical_percent = 120.0;
        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["limits.soh.warning_percent", "limits.soh.critical_percent"]
        );

        cfg.limits.soh.warning_percent = 80.0;
        cfg.limits.soh.critical_percent = -1.0;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "limits.soh.critical_percent");
    }

    #[test]
    fn validation_catches_normal_current_at_idle() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.limits.current.idle_a = 0.5;
        cfg.limits.current.discharge_normal_max_a = 0.5;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "limits.current.discharge_normal_max_a");
    }

    #[test]
    fn validation_catches_zero_cells() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.cells = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.cells"));
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.pack.charge_efficiency = 1.2;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pack.charge_efficiency"));
    }

    #[test]
    fn validation_catches_inverted_soc_thresholds() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.pack.soc_empty_threshold_percent = 99.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "pack.soc_empty_threshold_percent")
        );
    }

    #[test]
    fn validation_catches_unordered_band() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.limits.voltage.normal_max = 4.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "limits.voltage"));
    }

    #[test]
    fn validation_catches_unordered_current_limits() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.limits.current.discharge_warning_max_a = 5.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "limits.current.discharge_normal_max_a")
        );
    }

    #[test]
    fn validation_catches_bad_fault_probability() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.sensor.fault_probability = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sensor.fault_probability"));
    }

    #[test]
    fn error_display_includes_field() {
        let e = ConfigError::new("pack.charge_efficiency", "must be in (0.0, 1.0]");
        assert_eq!(
            e.to_string(),
            "config error: pack.charge_efficiency: must be in (0.0, 1.0]"
        );
    }
}
