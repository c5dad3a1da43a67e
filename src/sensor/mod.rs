//! Measurement sources feeding the monitor.

/// Seeded random source with fault injection.
pub mod simulator;
pub mod types;

pub use simulator::SensorSimulator;
pub use types::{FixedSource, MeasurementSource};
