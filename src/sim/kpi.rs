//! Post-hoc run summary computed from tick reports.

use std::fmt;

use crate::bms::{Severity, TickReport};

/// Aggregate indicators derived from a complete run.
///
/// Computed post-hoc from `&[TickReport]` so the summary always agrees with
/// the per-tick data.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of ticks.
    pub ticks: usize,
    /// Ticks spent in each tier, indexed by [`Severity::index`].
    pub ticks_per_state: [usize; 4],
    /// Number of ticks whose tier differed from the preceding tick.
    pub transitions: usize,
    /// Worst tier seen.
    pub worst_state: Severity,
    /// Largest charging current (A, >= 0).
    pub peak_charge_a: f32,
    /// Largest discharging current (A, positive magnitude).
    pub peak_discharge_a: f32,
    /// SoC after the last tick (%).
    pub final_soc_percent: f32,
    /// SoH after the last tick (%).
    pub final_soh_percent: f32,
    /// Cycles counted by the end of the run.
    pub charge_cycles: f32,
}

impl RunSummary {
    /// Computes the summary from the complete report vector.
    ///
    /// Transitions are counted against an initial Normal state, matching
    /// the monitor's transition notifications.
    pub fn from_reports(reports: &[TickReport]) -> Self {
        let mut ticks_per_state = [0_usize; 4];
        let mut transitions = 0_usize;
        let mut previous = Severity::Normal;
        let mut worst = Severity::Normal;
        let mut peak_charge = 0.0_f32;
        let mut peak_discharge = 0.0_f32;

        for r in reports {
            ticks_per_state[r.state.index()] += 1;
            if r.state != previous {
                transitions += 1;
            }
            previous = r.state;
            worst = worst.max(r.state);
            peak_charge = peak_charge.max(r.pack_current_a);
            peak_discharge = peak_discharge.max(-r.pack_current_a);
        }

        let last = reports.last();
        Self {
            ticks: reports.len(),
            ticks_per_state,
            transitions,
            worst_state: worst,
            peak_charge_a: peak_charge,
            peak_discharge_a: peak_discharge,
            final_soc_percent: last.map_or(0.0, |r| r.soc_percent),
            final_soh_percent: last.map_or(100.0, |r| r.soh_percent),
            charge_cycles: last.map_or(0.0, |r| r.charge_cycles),
        }
    }

    /// Ticks spent in `state`.
    pub fn ticks_in(&self, state: Severity) -> usize {
        self.ticks_per_state[state.index()]
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(f, "Ticks:              {}", self.ticks)?;
        for state in Severity::ALL {
            writeln!(f, "  {:<17} {}", format!("{state}:"), self.ticks_in(state))?;
        }
        writeln!(f, "Transitions:        {}", self.transitions)?;
        writeln!(f, "Worst state:        {}", self.worst_state)?;
        writeln!(
            f,
            "Peak current:       {:.2} A charge, {:.2} A discharge",
            self.peak_charge_a, self.peak_discharge_a
        )?;
        writeln!(f, "Final SoC:          {:.1}%", self.final_soc_percent)?;
        writeln!(f, "Final SoH:          {:.1}%", self.final_soh_percent)?;
        write!(f, "Charge cycles:      {:.1}", self.charge_cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(tick: usize, state: Severity, current: f32) -> TickReport {
        TickReport {
            tick,
            time_s: tick as f32 + 1.0,
            state,
            soc_percent: 50.0,
            charge_mah: 1500.0,
            soh_percent: 99.9,
            pack_current_a: current,
            is_charging: current > 0.0,
            charge_cycles: 1.0,
            min_cell_voltage_v: 3.7,
            max_cell_voltage_v: 3.7,
            max_cell_temperature_c: 25.0,
        }
    }

    #[test]
    fn counts_states_and_transitions() {
        let states = [
            Severity::Normal,
            Severity::Warning,
            Severity::Warning,
            Severity::Fault,
            Severity::Normal,
        ];
        let reports: Vec<_> = states
            .iter()
            .enumerate()
            .map(|(t, &s)| make_report(t, s, 0.0))
            .collect();
        let summary = RunSummary::from_reports(&reports);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.ticks_in(Severity::Warning), 2);
        assert_eq!(summary.ticks_in(Severity::Critical), 0);
        assert_eq!(summary.transitions, 3);
        assert_eq!(summary.worst_state, Severity::Fault);
    }

    #[test]
    fn first_tick_away_from_normal_is_a_transition() {
        let reports = vec![make_report(0, Severity::Critical, 0.0)];
        assert_eq!(RunSummary::from_reports(&reports).transitions, 1);
    }

    #[test]
    fn peak_currents_by_direction() {
        let reports: Vec<_> = [3.0, -12.0, 1.0, -4.0]
            .iter()
            .enumerate()
            .map(|(t, &i)| make_report(t, Severity::Normal, i))
            .collect();
        let summary = RunSummary::from_reports(&reports);
        assert_eq!(summary.peak_charge_a, 3.0);
        assert_eq!(summary.peak_discharge_a, 12.0);
    }

    #[test]
    fn empty_reports() {
        let summary = RunSummary::from_reports(&[]);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.transitions, 0);
        assert_eq!(summary.worst_state, Severity::Normal);
        assert_eq!(summary.final_soh_percent, 100.0);
    }

    #[test]
    fn display_lists_every_state() {
        let summary = RunSummary::from_reports(&[make_report(0, Severity::Normal, 0.0)]);
        let text = summary.to_string();
        for state in Severity::ALL {
            assert!(text.contains(state.as_str()));
        }
    }
}
