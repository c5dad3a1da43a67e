//! Per-tick records exposed to hosts and sinks.

use std::fmt;

use super::severity::Severity;

/// Snapshot of the pack after one completed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick index, starting at 0.
    pub tick: usize,
    /// Simulated time elapsed at the end of this tick (s).
    pub time_s: f32,
    /// Tier computed on this tick.
    pub state: Severity,
    /// State of charge (%, 0 to 100).
    pub soc_percent: f32,
    /// Charge held by the pack as counted by the estimator (mAh).
    pub charge_mah: f32,
    /// State of health (%, 0 to 100).
    pub soh_percent: f32,
    /// Pack current (A; positive = charging).
    pub pack_current_a: f32,
    /// Sticky charging direction flag.
    pub is_charging: bool,
    /// Cycles counted so far.
    pub charge_cycles: f32,
    /// Lowest cell voltage (V).
    pub min_cell_voltage_v: f32,
    /// Highest cell voltage (V).
    pub max_cell_voltage_v: f32,
    /// Highest cell temperature (C).
    pub max_cell_temperature_c: f32,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({:>7.1}s) | {:<8} | SoC={:>5.1}%  SoH={:>5.1}% | I={:>6.2} A  charging={} \
             | cells {:.3}..{:.3} V  max {:.1} C",
            self.tick,
            self.time_s,
            self.state,
            self.soc_percent,
            self.soh_percent,
            self.pack_current_a,
            if self.is_charging { "YES" } else { "NO" },
            self.min_cell_voltage_v,
            self.max_cell_voltage_v,
            self.max_cell_temperature_c,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_contains_state_and_soc() {
        let r = TickReport {
            tick: 3,
            time_s: 4.0,
            state: Severity::Warning,
            soc_percent: 50.5,
            charge_mah: 1515.0,
            soh_percent: 100.0,
            pack_current_a: -1.25,
            is_charging: false,
            charge_cycles: 0.0,
            min_cell_voltage_v: 2.9,
            max_cell_voltage_v: 3.7,
            max_cell_temperature_c: 25.0,
        };
        let s = r.to_string();
        assert!(s.contains("WARNING"));
        assert!(s.contains("SoC= 50.5%"));
        assert!(s.contains("charging=NO"));
    }
}
