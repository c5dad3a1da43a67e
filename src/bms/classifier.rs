//! Tiered severity classification of a pack snapshot.

use std::fmt;

use super::cell::CellReading;
use super::limits::SafetyLimits;
use super::severity::Severity;

/// Signal that pushed the pack out of Normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    CellVoltage {
        cell: usize,
        voltage_v: f32,
        severity: Severity,
    },
    CellTemperature {
        cell: usize,
        temperature_c: f32,
        severity: Severity,
    },
    PackCurrent {
        current_a: f32,
        severity: Severity,
    },
    StateOfHealth {
        soh_percent: f32,
        severity: Severity,
    },
}

impl Trigger {
    /// Tier contributed by this signal.
    pub fn severity(&self) -> Severity {
        match *self {
            Trigger::CellVoltage { severity, .. }
            | Trigger::CellTemperature { severity, .. }
            | Trigger::PackCurrent { severity, .. }
            | Trigger::StateOfHealth { severity, .. } => severity,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::CellVoltage {
                cell,
                voltage_v,
                severity,
            } => write!(f, "cell {cell} voltage {voltage_v:.3} V ({severity})"),
            Trigger::CellTemperature {
                cell,
                temperature_c,
                severity,
            } => write!(f, "cell {cell} temperature {temperature_c:.1} C ({severity})"),
            Trigger::PackCurrent {
                current_a,
                severity,
            } => write!(f, "pack current {current_a:.2} A ({severity})"),
            Trigger::StateOfHealth {
                soh_percent,
                severity,
            } => write!(f, "state of health {soh_percent:.1}% ({severity})"),
        }
    }
}

/// Full evaluation of every signal in a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    /// Worst tier across all signals.
    pub severity: Severity,
    /// Every signal outside its normal band, in evaluation order.
    pub triggers: Vec<Trigger>,
}

impl Assessment {
    /// Triggers at exactly the overall tier.
    pub fn worst_triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers
            .iter()
            .filter(move |t| t.severity() == self.severity)
    }
}

/// Stateless severity classifier over an immutable threshold set.
#[derive(Debug, Clone)]
pub struct Classifier {
    limits: SafetyLimits,
}

impl Classifier {
    pub fn new(limits: SafetyLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// Returns the worst applicable tier.
    ///
    /// Tiers are evaluated from Fault downwards and evaluation stops at the
    /// first tier that matches: any cell outside its fault range ends the
    /// search immediately. Never fails; every input maps to a tier.
    pub fn classify(
        &self,
        cells: &[CellReading],
        pack_current_a: f32,
        soh_percent: f32,
    ) -> Severity {
        let voltage = &self.limits.voltage;
        let temperature = &self.limits.temperature;
        let cell_at = |cell: &CellReading, tier: Severity| {
            voltage.severity(cell.voltage_v) == tier
                || temperature.severity(cell.temperature_c) == tier
        };

        if cells.iter().any(|c| cell_at(c, Severity::Fault)) {
            return Severity::Fault;
        }

        let current = self.limits.current.severity(pack_current_a);
        let soh = self.limits.soh.severity(soh_percent);

        if current == Severity::Critical
            || soh == Severity::Critical
            || cells.iter().any(|c| cell_at(c, Severity::Critical))
        {
            return Severity::Critical;
        }

        if current == Severity::Warning
            || soh == Severity::Warning
            || cells.iter().any(|c| cell_at(c, Severity::Warning))
        {
            return Severity::Warning;
        }

        Severity::Normal
    }

    /// Evaluates every signal and records each one outside its normal band.
    ///
    /// The resulting tier always equals [`Classifier::classify`] for the
    /// same inputs.
    pub fn assess(
        &self,
        cells: &[CellReading],
        pack_current_a: f32,
        soh_percent: f32,
    ) -> Assessment {
        let mut triggers = Vec::new();

        for cell in cells {
            let severity = self.limits.voltage.severity(cell.voltage_v);
            if severity > Severity::Normal {
                triggers.push(Trigger::CellVoltage {
                    cell: cell.id(),
                    voltage_v: cell.voltage_v,
                    severity,
                });
            }
            let severity = self.limits.temperature.severity(cell.temperature_c);
            if severity > Severity::Normal {
                triggers.push(Trigger::CellTemperature {
                    cell: cell.id(),
                    temperature_c: cell.temperature_c,
                    severity,
                });
            }
        }

        let severity = self.limits.current.severity(pack_current_a);
        if severity > Severity::Normal {
            triggers.push(Trigger::PackCurrent {
                current_a: pack_current_a,
                severity,
            });
        }

        let severity = self.limits.soh.severity(soh_percent);
        if severity > Severity::Normal {
            triggers.push(Trigger::StateOfHealth {
                soh_percent,
                severity,
            });
        }

        let severity = triggers
            .iter()
            .map(Trigger::severity)
            .max()
            .unwrap_or_default();

        Assessment { severity, triggers }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(SafetyLimits::default())
    }
}
