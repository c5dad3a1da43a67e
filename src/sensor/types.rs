//! Measurement source capability consumed by the monitor.

/// Supplies raw pack measurements once per tick.
///
/// Implementations may be hardware drivers, simulators or fixtures. Calls are
/// synchronous and expected to return promptly. Any value is accepted;
/// out-of-range or non-finite readings are classified, never rejected.
pub trait MeasurementSource {
    /// Voltage of cell `cell_id` in volts.
    fn read_voltage(&mut self, cell_id: usize) -> f32;

    /// Temperature of cell `cell_id` in degrees Celsius.
    fn read_temperature(&mut self, cell_id: usize) -> f32;

    /// Pack current in amperes; positive charges the pack.
    fn read_current(&mut self) -> f32;
}

impl<T: MeasurementSource + ?Sized> MeasurementSource for &mut T {
    fn read_voltage(&mut self, cell_id: usize) -> f32 {
        (**self).read_voltage(cell_id)
    }

    fn read_temperature(&mut self, cell_id: usize) -> f32 {
        (**self).read_temperature(cell_id)
    }

    fn read_current(&mut self) -> f32 {
        (**self).read_current()
    }
}

/// Source returning caller-set values until changed.
///
/// A cell id past the configured count reads as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSource {
    voltages_v: Vec<f32>,
    temperatures_c: Vec<f32>,
    current_a: f32,
}

impl FixedSource {
    /// Every cell at the same voltage and temperature.
    pub fn uniform(cells: usize, voltage_v: f32, temperature_c: f32, current_a: f32) -> Self {
        Self {
            voltages_v: vec![voltage_v; cells],
            temperatures_c: vec![temperature_c; cells],
            current_a,
        }
    }

    /// Overrides one cell. Ids beyond the cell count are ignored.
    pub fn set_cell(&mut self, cell_id: usize, voltage_v: f32, temperature_c: f32) {
        if let Some(v) = self.voltages_v.get_mut(cell_id) {
            *v = voltage_v;
        }
        if let Some(t) = self.temperatures_c.get_mut(cell_id) {
            *t = temperature_c;
        }
    }

    pub fn set_voltage(&mut self, cell_id: usize, voltage_v: f32) {
        if let Some(v) = self.voltages_v.get_mut(cell_id) {
            *v = voltage_v;
        }
    }

    pub fn set_current(&mut self, current_a: f32) {
        self.current_a = current_a;
    }

    /// Builder form of [`FixedSource::set_cell`].
    pub fn with_cell(mut self, cell_id: usize, voltage_v: f32, temperature_c: f32) -> Self {
        self.set_cell(cell_id, voltage_v, temperature_c);
        self
    }
}

impl MeasurementSource for FixedSource {
    fn read_voltage(&mut self, cell_id: usize) -> f32 {
        self.voltages_v.get(cell_id).copied().unwrap_or(f32::NAN)
    }

    fn read_temperature(&mut self, cell_id: usize) -> f32 {
        self.temperatures_c.get(cell_id).copied().unwrap_or(f32::NAN)
    }

    fn read_current(&mut self) -> f32 {
        self.current_a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_source_reads_back_values() {
        let mut src = FixedSource::uniform(4, 3.7, 25.0, 1.0);
        assert_eq!(src.read_voltage(3), 3.7);
        assert_eq!(src.read_temperature(0), 25.0);
        assert_eq!(src.read_current(), 1.0);
    }

    #[test]
    fn unknown_cell_reads_nan() {
        let mut src = FixedSource::uniform(2, 3.7, 25.0, 0.0);
        assert!(src.read_voltage(2).is_nan());
        assert!(src.read_temperature(9).is_nan());
    }

    #[test]
    fn overrides_apply_to_one_cell() {
        let mut src = FixedSource::uniform(4, 3.7, 25.0, 0.0).with_cell(1, 4.35, 30.0);
        src.set_current(-22.0);
        assert_eq!(src.read_voltage(1), 4.35);
        assert_eq!(src.read_temperature(1), 30.0);
        assert_eq!(src.read_voltage(0), 3.7);
        assert_eq!(src.read_current(), -22.0);
    }
}
