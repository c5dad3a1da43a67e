use crate::config::PackConfig;

const SECONDS_PER_HOUR: f32 = 3600.0;
const MILLIAMPS_PER_AMP: f32 = 1000.0;

/// Coulomb counter tracking accumulated charge and state of charge.
///
/// Charge is integrated in mAh. Only charging is derated by the charge
/// efficiency; discharge deltas are applied as measured.
#[derive(Debug, Clone)]
pub struct ChargeEstimator {
    nominal_capacity_mah: f32,
    charge_efficiency: f32,
    idle_current_a: f32,
    accumulated_mah: f32,
    soc_percent: f32,
}

impl ChargeEstimator {
    /// Creates a counter seeded at `initial_soc_percent` of nominal capacity.
    ///
    /// # Arguments
    ///
    /// * `nominal_capacity_mah` - Nominal pack capacity (mAh, > 0)
    /// * `initial_soc_percent` - Starting state of charge (%)
    /// * `charge_efficiency` - Fraction of charging current that is stored (0..1.0]
    /// * `idle_current_a` - Current magnitude at or below which the pack is idle
    ///
    /// # Panics
    ///
    /// Panics if capacity is not positive or the efficiency is outside (0, 1].
    pub fn new(
        nominal_capacity_mah: f32,
        initial_soc_percent: f32,
        charge_efficiency: f32,
        idle_current_a: f32,
    ) -> Self {
        assert!(nominal_capacity_mah > 0.0);
        assert!(charge_efficiency > 0.0 && charge_efficiency <= 1.0);

        let soc_percent = initial_soc_percent.clamp(0.0, 100.0);
        Self {
            nominal_capacity_mah,
            charge_efficiency,
            idle_current_a,
            accumulated_mah: nominal_capacity_mah * soc_percent / 100.0,
            soc_percent,
        }
    }

    /// Builds the counter from the `[pack]` section.
    pub fn from_config(pack: &PackConfig, idle_current_a: f32) -> Self {
        Self::new(
            pack.nominal_capacity_mah,
            pack.initial_soc_percent,
            pack.charge_efficiency,
            idle_current_a,
        )
    }

    /// Integrates `current_a` over `dt_s` seconds.
    ///
    /// Positive current charges the pack. The accumulator saturates at
    /// `[0, nominal_capacity]` and a NaN delta is ignored, so SoC stays
    /// within `[0, 100]` for any input.
    pub fn update(&mut self, dt_s: f32, current_a: f32) {
        let mut delta_mah = current_a * MILLIAMPS_PER_AMP * (dt_s / SECONDS_PER_HOUR);

        if current_a > self.idle_current_a {
            delta_mah *= self.charge_efficiency;
        }

        if !delta_mah.is_nan() {
            self.accumulated_mah =
                (self.accumulated_mah + delta_mah).clamp(0.0, self.nominal_capacity_mah);
        }

        self.soc_percent =
            (self.accumulated_mah / self.nominal_capacity_mah * 100.0).clamp(0.0, 100.0);
    }

    /// State of charge in percent.
    pub fn soc_percent(&self) -> f32 {
        self.soc_percent
    }

    /// Accumulated charge in mAh.
    pub fn accumulated_mah(&self) -> f32 {
        self.accumulated_mah
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn counter() -> ChargeEstimator {
        ChargeEstimator::new(3000.0, 50.0, 0.98, 0.05)
    }

    #[test]
    fn starts_at_seed_soc() {
        let c = counter();
        assert_eq!(c.accumulated_mah(), 1500.0);
        assert_eq!(c.soc_percent(), 50.0);
    }

    #[test]
    fn charging_is_derated_by_efficiency() {
        let mut c = counter();
        // 1 A for one hour = 1000 mAh, 980 mAh stored
        c.update(3600.0, 1.0);
        assert_abs_diff_eq!(c.accumulated_mah(), 2480.0, epsilon = 1e-2);
        assert_abs_diff_eq!(c.soc_percent(), 2480.0 / 30.0, epsilon = 1e-3);
    }

    #[test]
    fn discharging_is_not_derated() {
        let mut c = counter();
        c.update(3600.0, -1.0);
        assert_abs_diff_eq!(c.accumulated_mah(), 500.0, epsilon = 1e-2);
    }

    #[test]
    fn current_at_idle_threshold_is_not_derated() {
        let mut c = counter();
        c.update(3600.0, 0.05);
        assert_abs_diff_eq!(c.accumulated_mah(), 1550.0, epsilon = 1e-2);

        let mut d = counter();
        d.update(3600.0, 0.06);
        assert_abs_diff_eq!(d.accumulated_mah(), 1500.0 + 60.0 * 0.98, epsilon = 1e-2);
    }

    #[test]
    fn saturates_at_full_and_empty() {
        let mut c = counter();
        c.update(36_000.0, 100.0);
        assert_eq!(c.accumulated_mah(), 3000.0);
        assert_eq!(c.soc_percent(), 100.0);

        c.update(36_000.0, -100.0);
        assert_eq!(c.accumulated_mah(), 0.0);
        assert_eq!(c.soc_percent(), 0.0);
    }

    #[test]
    fn non_finite_inputs_keep_soc_in_range() {
        let mut c = counter();
        c.update(1.0, f32::NAN);
        assert_eq!(c.soc_percent(), 50.0);

        c.update(0.0, f32::INFINITY);
        assert_eq!(c.soc_percent(), 50.0);

        c.update(1.0, f32::INFINITY);
        assert_eq!(c.soc_percent(), 100.0);

        c.update(1.0, f32::NEG_INFINITY);
        assert_eq!(c.soc_percent(), 0.0);
    }

    #[test]
    fn negative_elapsed_time_still_clamps() {
        let mut c = counter();
        c.update(-1.0e9, 5.0);
        assert_eq!(c.soc_percent(), 0.0);
    }

    #[test]
    fn initial_soc_is_clamped() {
        let c = ChargeEstimator::new(3000.0, 150.0, 0.98, 0.05);
        assert_eq!(c.soc_percent(), 100.0);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        ChargeEstimator::new(0.0, 50.0, 0.98, 0.05);
    }
}
