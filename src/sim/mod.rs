/// Tick clock for pacing the host loop.
pub mod clock;
pub mod kpi;
