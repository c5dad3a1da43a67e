//! Battery-pack monitor: per-tick safety classification, coulomb-counting
//! state of charge, and cycle-based state of health, with a seeded sensor
//! simulator to drive it.

/// Monitor core: classifier, estimators, and the tick orchestrator.
pub mod bms;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
/// Measurement sources: the sensor simulator and a fixed test source.
pub mod sensor;
/// Host loop clock and post-hoc run summary.
pub mod sim;
