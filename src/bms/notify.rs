//! Notification sink interface and the shipped sinks.

use tracing::{Level, error, info, warn};

use super::classifier::Trigger;
use super::severity::Severity;
use super::types::TickReport;

/// Delivery priority of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Routine,
    High,
}

/// Event emitted by the monitor to its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Routine per-tick status.
    Report(TickReport),
    /// Tier differs from the previous tick's tier.
    Transition {
        tick: usize,
        from: Severity,
        to: Severity,
    },
    /// A half-cycle was counted on this tick.
    HalfCycle { tick: usize, cycles: f32 },
    /// The pack is in Fault on this tick. Emitted every Fault tick.
    Fault { tick: usize, triggers: Vec<Trigger> },
}

impl Notification {
    pub fn priority(&self) -> Priority {
        match self {
            Notification::Fault { .. } => Priority::High,
            _ => Priority::Routine,
        }
    }
}

/// Receiver of monitor notifications.
///
/// Called synchronously from within the tick; implementations should not
/// block.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

/// Records every notification in order.
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for &mut T {
    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification);
    }
}

/// Operator guidance attached to status logs for each tier.
fn handling_advice(state: Severity) -> &'static str {
    match state {
        Severity::Normal => "operating normally",
        Severity::Warning => "check parameters",
        Severity::Critical => "prepare for shutdown or severe limitation",
        Severity::Fault => "immediate action required",
    }
}

/// Level of the per-tick status event: anything above Normal is a warning.
fn report_level(state: Severity) -> Level {
    if state > Severity::Normal {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// Forwards notifications to `tracing` as structured events.
///
/// Status reports log at info while Normal and at warn otherwise, together
/// with the handling advice for the tier.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: &Notification) {
        match notification {
            Notification::Report(r) => {
                let advice = handling_advice(r.state);
                if report_level(r.state) == Level::INFO {
                    info!(
                        tick = r.tick,
                        state = %r.state,
                        soc = format_args!("{:.1}", r.soc_percent),
                        soh = format_args!("{:.1}", r.soh_percent),
                        current_a = format_args!("{:.2}", r.pack_current_a),
                        charging = r.is_charging,
                        "Pack status",
                    );
                } else {
                    warn!(
                        tick = r.tick,
                        state = %r.state,
                        soc = format_args!("{:.1}", r.soc_percent),
                        soh = format_args!("{:.1}", r.soh_percent),
                        current_a = format_args!("{:.2}", r.pack_current_a),
                        charging = r.is_charging,
                        advice,
                        "Pack status",
                    );
                }
            }
            Notification::Transition { tick, from, to } => {
                warn!(tick, %from, %to, "Severity transition");
            }
            Notification::HalfCycle { tick, cycles } => {
                info!(tick, cycles, "Charge cycle incremented");
            }
            Notification::Fault { tick, triggers } => {
                let culprits = triggers
                    .iter()
                    .filter(|t| t.severity() == Severity::Fault)
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                error!(
                    tick,
                    %culprits,
                    advice = handling_advice(Severity::Fault),
                    "Pack in FAULT",
                );
            }
        }
    }
}
