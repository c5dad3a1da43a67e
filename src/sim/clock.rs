use std::thread;
use std::time::Duration;

/// Tick clock for the host loop, bounded or unbounded.
///
/// The monitor itself never sleeps; pacing is the host's job. With
/// `realtime` enabled, every tick after the first waits one interval.
///
/// # Examples
///
/// ```
/// use bms_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(Some(3), 1000);
/// let mut ticks = Vec::new();
///
/// clock.run(|tick| ticks.push(tick));
/// assert_eq!(ticks, vec![0, 1, 2]);
/// ```
pub struct Clock {
    /// Current tick
    current: usize,
    /// Total ticks to run, `None` for no limit
    total: Option<usize>,
    interval: Duration,
    realtime: bool,
}

impl Clock {
    /// Creates a clock running `total` ticks of `interval_ms` each.
    pub fn new(total: Option<usize>, interval_ms: u64) -> Self {
        Self {
            current: 0,
            total,
            interval: Duration::from_millis(interval_ms),
            realtime: false,
        }
    }

    /// Enables sleeping for the interval between ticks.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Tick length in seconds.
    pub fn dt_s(&self) -> f32 {
        self.interval.as_secs_f32()
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick number (starting from 0) before advancing
    /// * `None` - If the clock has reached its total
    pub fn tick(&mut self) -> Option<usize> {
        if self.total.is_some_and(|total| self.current >= total) {
            return None;
        }
        if self.realtime && self.current > 0 {
            thread::sleep(self.interval);
        }
        let tick = self.current;
        self.current += 1;
        Some(tick)
    }

    /// Runs a function for each remaining tick.
    pub fn run(&mut self, mut f: impl FnMut(usize)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}
