//! Battery monitor core: estimators, classifier and tick orchestration.

pub mod cell;
/// Coulomb-counting state-of-charge estimator.
pub mod charge;
pub mod classifier;
pub mod engine;
/// Cycle-counting state-of-health estimator.
pub mod health;
pub mod limits;
pub mod notify;
pub mod severity;
pub mod types;

pub use cell::CellReading;
pub use charge::ChargeEstimator;
pub use classifier::{Assessment, Classifier, Trigger};
pub use engine::{Bms, Immediate, SeverityPolicy};
pub use health::HealthEstimator;
pub use limits::{Band, CurrentLimits, SafetyLimits, SohLimits};
pub use notify::{Notification, NotificationSink, Priority, TracingSink};
pub use severity::Severity;
pub use types::TickReport;
