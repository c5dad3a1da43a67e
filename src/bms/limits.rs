//! Threshold sets for the severity classifier.
//!
//! Every limit set deserializes from the `[limits]` section of a scenario
//! file and defaults to the reference pack (4S Li-ion, 3 Ah). Omitted
//! fields keep their defaults, including single limits inside a band.

use serde::{Deserialize, Deserializer};

use super::severity::Severity;

/// Nested bands for one cell metric (voltage or temperature).
///
/// Ordered low to high:
/// `fault_min <= critical_min <= warning_min <= normal_min <= normal_max
/// <= warning_max <= critical_max <= fault_max`.
///
/// The critical limits are the rated extremes of the cell. Classification
/// treats everything between the warning band and the fault limit as
/// Critical, so they only matter to sensor fault injection and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub fault_min: f32,
    pub critical_min: f32,
    pub warning_min: f32,
    pub normal_min: f32,
    pub normal_max: f32,
    pub warning_max: f32,
    pub critical_max: f32,
    pub fault_max: f32,
}

impl Band {
    /// Default cell voltage band in volts.
    pub fn cell_voltage() -> Self {
        Self {
            fault_min: 1.00,
            critical_min: 2.50,
            warning_min: 2.80,
            normal_min: 3.00,
            normal_max: 4.20,
            warning_max: 4.30,
            critical_max: 4.40,
            fault_max: 4.80,
        }
    }

    /// Default cell temperature band in degrees Celsius.
    pub fn cell_temperature() -> Self {
        Self {
            fault_min: -20.0,
            critical_min: -10.0,
            warning_min: -5.0,
            normal_min: 0.0,
            normal_max: 45.0,
            warning_max: 50.0,
            critical_max: 60.0,
            fault_max: 70.0,
        }
    }

    /// Tier of a single value. Band edges belong to the less severe side;
    /// NaN lies outside every band and is a Fault.
    pub fn severity(&self, value: f32) -> Severity {
        if !(self.fault_min..=self.fault_max).contains(&value) {
            Severity::Fault
        } else if (self.normal_min..=self.normal_max).contains(&value) {
            Severity::Normal
        } else if (self.warning_min..=self.warning_max).contains(&value) {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    /// Limits in ascending order, for ordering checks.
    pub fn ordered(&self) -> [f32; 8] {
        [
            self.fault_min,
            self.critical_min,
            self.warning_min,
            self.normal_min,
            self.normal_max,
            self.warning_max,
            self.critical_max,
            self.fault_max,
        ]
    }
}

/// Band section as written in a scenario file; absent limits fall back to
/// the base band.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BandOverrides {
    fault_min: Option<f32>,
    critical_min: Option<f32>,
    warning_min: Option<f32>,
    normal_min: Option<f32>,
    normal_max: Option<f32>,
    warning_max: Option<f32>,
    critical_max: Option<f32>,
    fault_max: Option<f32>,
}

impl BandOverrides {
    fn over(self, base: Band) -> Band {
        Band {
            fault_min: self.fault_min.unwrap_or(base.fault_min),
            critical_min: self.critical_min.unwrap_or(base.critical_min),
            warning_min: self.warning_min.unwrap_or(base.warning_min),
            normal_min: self.normal_min.unwrap_or(base.normal_min),
            normal_max: self.normal_max.unwrap_or(base.normal_max),
            warning_max: self.warning_max.unwrap_or(base.warning_max),
            critical_max: self.critical_max.unwrap_or(base.critical_max),
            fault_max: self.fault_max.unwrap_or(base.fault_max),
        }
    }
}

fn voltage_band<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Band, D::Error> {
    BandOverrides::deserialize(deserializer).map(|o| o.over(Band::cell_voltage()))
}

fn temperature_band<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Band, D::Error> {
    BandOverrides::deserialize(deserializer).map(|o| o.over(Band::cell_temperature()))
}

/// Pack current limits in amperes, separate for each direction.
///
/// Positive current charges the pack. Magnitudes at or below `idle_a` count
/// as neither charging nor discharging.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrentLimits {
    pub idle_a: f32,
    pub charge_normal_max_a: f32,
    pub charge_warning_max_a: f32,
    pub charge_critical_max_a: f32,
    pub discharge_normal_max_a: f32,
    pub discharge_warning_max_a: f32,
    pub discharge_critical_max_a: f32,
}

impl Default for CurrentLimits {
    fn default() -> Self {
        Self {
            idle_a: 0.05,
            charge_normal_max_a: 2.0,
            charge_warning_max_a: 3.0,
            charge_critical_max_a: 4.0,
            discharge_normal_max_a: 10.0,
            discharge_warning_max_a: 15.0,
            discharge_critical_max_a: 20.0,
        }
    }
}

impl CurrentLimits {
    /// Tier of the pack current.
    ///
    /// Idle current is always Normal. Past the warning limit the current is
    /// Critical however large it gets; current never produces a Fault. A NaN
    /// reading cannot be placed in either direction and is treated as
    /// Critical.
    pub fn severity(&self, current_a: f32) -> Severity {
        if current_a.is_nan() {
            return Severity::Critical;
        }
        let (magnitude, normal_max, warning_max) = if current_a > self.idle_a {
            (
                current_a,
                self.charge_normal_max_a,
                self.charge_warning_max_a,
            )
        } else if current_a < -self.idle_a {
            (
                -current_a,
                self.discharge_normal_max_a,
                self.discharge_warning_max_a,
            )
        } else {
            return Severity::Normal;
        };

        if magnitude <= normal_max {
            Severity::Normal
        } else if magnitude <= warning_max {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    /// `true` when `current_a` is above the idle threshold in the charging direction.
    pub fn is_charging(&self, current_a: f32) -> bool {
        current_a > self.idle_a
    }

    /// `true` when `current_a` is above the idle threshold in the discharging direction.
    pub fn is_discharging(&self, current_a: f32) -> bool {
        current_a < -self.idle_a
    }
}

/// State-of-health limits in percent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SohLimits {
    /// Below this the pack is in Warning.
    pub warning_percent: f32,
    /// Below this the pack is Critical.
    pub critical_percent: f32,
}

impl Default for SohLimits {
    fn default() -> Self {
        Self {
            warning_percent: 80.0,
            critical_percent: 60.0,
        }
    }
}

impl SohLimits {
    /// Tier of a state-of-health value. Never a Fault.
    pub fn severity(&self, soh_percent: f32) -> Severity {
        if soh_percent >= self.warning_percent {
            Severity::Normal
        } else if soh_percent >= self.critical_percent {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }
}

/// Complete, immutable threshold set handed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyLimits {
    #[serde(deserialize_with = "voltage_band")]
    pub voltage: Band,
    #[serde(deserialize_with = "temperature_band")]
    pub temperature: Band,
    pub current: CurrentLimits,
    pub soh: SohLimits,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            voltage: Band::cell_voltage(),
            temperature: Band::cell_temperature(),
            current: CurrentLimits::default(),
            soh: SohLimits::default(),
        }
    }
}
