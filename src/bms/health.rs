use crate::config::PackConfig;

/// Half-cycle counter deriving state of health from cumulative cycling.
///
/// A half-cycle is counted once the pack has been seen both full and empty,
/// in either order. The latches are independent and reset together.
#[derive(Debug, Clone)]
pub struct HealthEstimator {
    soc_full_percent: f32,
    soc_empty_percent: f32,
    degradation_per_cycle_percent: f32,
    charge_cycles: f32,
    was_full: bool,
    was_empty: bool,
    soh_percent: f32,
}

impl HealthEstimator {
    pub fn new(
        soc_full_percent: f32,
        soc_empty_percent: f32,
        degradation_per_cycle_percent: f32,
    ) -> Self {
        Self {
            soc_full_percent,
            soc_empty_percent,
            degradation_per_cycle_percent,
            charge_cycles: 0.0,
            was_full: false,
            was_empty: false,
            soh_percent: 100.0,
        }
    }

    pub fn from_config(pack: &PackConfig) -> Self {
        Self::new(
            pack.soc_full_threshold_percent,
            pack.soc_empty_threshold_percent,
            pack.degradation_per_cycle_percent,
        )
    }

    /// Feeds the freshly computed state of charge.
    ///
    /// Returns the new cycle total when this call completed a half-cycle.
    pub fn update(&mut self, soc_percent: f32) -> Option<f32> {
        if soc_percent >= self.soc_full_percent {
            self.was_full = true;
        }
        if soc_percent <= self.soc_empty_percent {
            self.was_empty = true;
        }

        let counted = if self.was_full && self.was_empty {
            self.charge_cycles += 0.5;
            self.was_full = false;
            self.was_empty = false;
            Some(self.charge_cycles)
        } else {
            None
        };

        let soh = 100.0 - self.charge_cycles * self.degradation_per_cycle_percent;
        self.soh_percent = if soh.is_nan() { 0.0 } else { soh.clamp(0.0, 100.0) };

        counted
    }

    /// Cycles counted so far, in steps of 0.5.
    pub fn charge_cycles(&self) -> f32 {
        self.charge_cycles
    }

    /// State of health in percent.
    pub fn soh_percent(&self) -> f32 {
        self.soh_percent
    }

    pub fn was_full(&self) -> bool {
        self.was_full
    }

    pub fn was_empty(&self) -> bool {
        self.was_empty
    }
}
