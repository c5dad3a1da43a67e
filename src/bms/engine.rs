//! Tick orchestrator owning the pack state, estimators and classifier.

use tracing::{debug, trace};

use super::cell::CellReading;
use super::charge::ChargeEstimator;
use super::classifier::Classifier;
use super::health::HealthEstimator;
use super::limits::SafetyLimits;
use super::notify::{Notification, NotificationSink};
use super::severity::Severity;
use super::types::TickReport;
use crate::config::{PackConfig, ScenarioConfig};
use crate::sensor::MeasurementSource;

/// Hook between the freshly classified tier and the reported state.
///
/// The monitor recomputes the tier from scratch every tick with no
/// hysteresis, so a noisy reading can make the state flap. Hosts that want
/// debounce at tier boundaries implement this trait; the default policy
/// [`Immediate`] applies every computed tier as is.
pub trait SeverityPolicy {
    fn apply(&mut self, previous: Severity, computed: Severity) -> Severity;
}

/// Reports the computed tier unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl SeverityPolicy for Immediate {
    fn apply(&mut self, _previous: Severity, computed: Severity) -> Severity {
        computed
    }
}

/// Battery pack monitor.
///
/// Generic over the measurement source and notification sink for static
/// dispatch. One call to [`Bms::tick`] reads every sensor, updates the
/// charge and health estimators, classifies the pack and notifies the sink.
/// Not internally synchronized; hosts sharing it across threads must
/// serialize access.
pub struct Bms<S: MeasurementSource, N: NotificationSink> {
    source: S,
    sink: N,
    classifier: Classifier,
    policy: Box<dyn SeverityPolicy + Send>,
    cells: Box<[CellReading]>,
    pack_current_a: f32,
    is_charging: bool,
    charge: ChargeEstimator,
    health: HealthEstimator,
    state: Severity,
    tick: usize,
    /// Elapsed time; accumulated in f64 so long runs don't drift.
    elapsed_s: f64,
}

impl<S: MeasurementSource, N: NotificationSink> Bms<S, N> {
    /// Creates a monitor for a pack of `cells` cells.
    ///
    /// # Arguments
    ///
    /// * `cells` - Number of cell slots (fixed for the monitor's lifetime)
    /// * `pack` - Capacity and estimator parameters
    /// * `limits` - Classification thresholds
    /// * `source` - Measurement source polled every tick
    /// * `sink` - Receiver of tick notifications
    ///
    /// # Panics
    ///
    /// Panics if the pack parameters are invalid (see [`ChargeEstimator::new`]).
    pub fn new(
        cells: usize,
        pack: &PackConfig,
        limits: SafetyLimits,
        source: S,
        sink: N,
    ) -> Self {
        let charge = ChargeEstimator::from_config(pack, limits.current.idle_a);
        let health = HealthEstimator::from_config(pack);
        Self {
            source,
            sink,
            classifier: Classifier::new(limits),
            policy: Box::new(Immediate),
            cells: (0..cells).map(|id| CellReading::new(id, 0.0, 0.0)).collect(),
            pack_current_a: 0.0,
            is_charging: false,
            charge,
            health,
            state: Severity::Normal,
            tick: 0,
            elapsed_s: 0.0,
        }
    }

    /// Creates a monitor from a validated scenario.
    pub fn from_config(config: &ScenarioConfig, source: S, sink: N) -> Self {
        Self::new(
            config.simulation.cells,
            &config.pack,
            config.limits,
            source,
            sink,
        )
    }

    /// Replaces the severity policy.
    pub fn with_policy(mut self, policy: impl SeverityPolicy + Send + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Runs one complete tick covering `dt_s` seconds.
    pub fn tick(&mut self, dt_s: f32) -> TickReport {
        for cell in self.cells.iter_mut() {
            let voltage_v = self.source.read_voltage(cell.id());
            let temperature_c = self.source.read_temperature(cell.id());
            cell.update(voltage_v, temperature_c);
        }
        self.pack_current_a = self.source.read_current();
        trace!(cells = ?self.cells, current_a = self.pack_current_a, "Read sensors");

        let current_limits = self.classifier.limits().current;
        if current_limits.is_charging(self.pack_current_a) {
            self.is_charging = true;
        } else if current_limits.is_discharging(self.pack_current_a) {
            self.is_charging = false;
        }

        self.charge.update(dt_s, self.pack_current_a);
        let half_cycle = self.health.update(self.charge.soc_percent());

        let computed =
            self.classifier
                .classify(&self.cells, self.pack_current_a, self.health.soh_percent());
        let previous = self.state;
        self.state = self.policy.apply(previous, computed);
        self.elapsed_s += f64::from(dt_s);

        let report = self.report();
        let tick = self.tick;
        self.tick += 1;

        if self.state != previous {
            debug!(tick, %previous, state = %self.state, "State changed");
            self.sink.notify(&Notification::Transition {
                tick,
                from: previous,
                to: self.state,
            });
        }
        if let Some(cycles) = half_cycle {
            self.sink.notify(&Notification::HalfCycle { tick, cycles });
        }
        self.sink.notify(&Notification::Report(report.clone()));
        if self.state == Severity::Fault {
            let assessment =
                self.classifier
                    .assess(&self.cells, self.pack_current_a, self.health.soh_percent());
            self.sink.notify(&Notification::Fault {
                tick,
                triggers: assessment.triggers,
            });
        }

        report
    }

    /// Runs `ticks` ticks of `dt_s` seconds each and collects their reports.
    pub fn run(&mut self, ticks: usize, dt_s: f32) -> Vec<TickReport> {
        (0..ticks).map(|_| self.tick(dt_s)).collect()
    }

    fn report(&self) -> TickReport {
        let voltages = self.cells.iter().map(|c| c.voltage_v);
        TickReport {
            tick: self.tick,
            time_s: self.elapsed_s as f32,
            state: self.state,
            soc_percent: self.charge.soc_percent(),
            charge_mah: self.charge.accumulated_mah(),
            soh_percent: self.health.soh_percent(),
            pack_current_a: self.pack_current_a,
            is_charging: self.is_charging,
            charge_cycles: self.health.charge_cycles(),
            min_cell_voltage_v: voltages.clone().fold(f32::INFINITY, f32::min),
            max_cell_voltage_v: voltages.fold(f32::NEG_INFINITY, f32::max),
            max_cell_temperature_c: self
                .cells
                .iter()
                .map(|c| c.temperature_c)
                .fold(f32::NEG_INFINITY, f32::max),
        }
    }

    /// Tier after the most recent tick.
    pub fn current_state(&self) -> Severity {
        self.state
    }

    /// State of charge (%).
    pub fn soc(&self) -> f32 {
        self.charge.soc_percent()
    }

    /// State of health (%).
    pub fn soh(&self) -> f32 {
        self.health.soh_percent()
    }

    /// Pack current from the most recent tick (A).
    pub fn pack_current(&self) -> f32 {
        self.pack_current_a
    }

    /// Charging direction; unchanged by idle ticks.
    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn charge_cycles(&self) -> f32 {
        self.health.charge_cycles()
    }

    pub fn cells(&self) -> &[CellReading] {
        &self.cells
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> usize {
        self.tick
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }
}
