/// Latest measurement for one cell slot of the pack.
///
/// The id is fixed when the pack is built; voltage and temperature are
/// replaced wholesale on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellReading {
    id: usize,
    /// Cell voltage in volts.
    pub voltage_v: f32,
    /// Cell temperature in degrees Celsius.
    pub temperature_c: f32,
}

impl CellReading {
    /// Creates a reading for slot `id`.
    pub fn new(id: usize, voltage_v: f32, temperature_c: f32) -> Self {
        Self {
            id,
            voltage_v,
            temperature_c,
        }
    }

    /// Slot index of this cell within the pack (`0..N`).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Overwrites both measured values.
    pub fn update(&mut self, voltage_v: f32, temperature_c: f32) {
        self.voltage_v = voltage_v;
        self.temperature_c = temperature_c;
    }
}

#[cfg(test)]
mod tests {
    use super::CellReading;

    #[test]
    fn update_keeps_id() {
        let mut cell = CellReading::new(3, 0.0, 0.0);
        cell.update(3.7, 25.0);
        assert_eq!(cell.id(), 3);
        assert_eq!(cell.voltage_v, 3.7);
        assert_eq!(cell.temperature_c, 25.0);
    }
}
