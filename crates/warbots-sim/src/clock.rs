//! Wall-clock pacing helpers for embeddings.
//!
//! The kernel itself is stepped explicitly with [`crate::Engine::tick`];
//! these helpers let a host loop convert elapsed wall time into the number
//! of steps owed at the fixed calculation rate, and measure the achieved
//! rate once per second.

use std::time::{Duration, Instant};

/// Accumulates wall-clock time into due simulation steps.
///
/// A host loop calls [`Cadence::due_steps`] every frame and steps the engine
/// that many times, which keeps simulation speed independent of the frame
/// rate. If the host falls more than a second behind, the backlog is dropped
/// and the schedule resynchronises instead of entering a catch-up spiral.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    /// At most one second of backlog is honoured.
    max_burst: u32,
    next: Instant,
}

impl Cadence {
    pub fn new(rate_hz: u32) -> Self {
        Self::starting_at(rate_hz, Instant::now())
    }

    /// Start the schedule at an explicit instant (useful in tests).
    pub fn starting_at(rate_hz: u32, start: Instant) -> Self {
        assert!(rate_hz > 0, "cadence rate must be positive");
        let period = Duration::from_nanos(1_000_000_000 / rate_hz as u64);
        Self {
            period,
            max_burst: rate_hz,
            next: start + period,
        }
    }

    /// Number of steps due at `now`. Advances the schedule by that many
    /// periods; resynchronises to `now` if the backlog exceeds one second.
    pub fn due_steps(&mut self, now: Instant) -> u32 {
        let mut steps = 0;
        while self.next <= now {
            steps += 1;
            self.next += self.period;
            if steps == self.max_burst {
                self.next = now + self.period;
                break;
            }
        }
        steps
    }
}

/// Counts events into once-per-second buckets, for a ticks-per-second or
/// frames-per-second readout.
#[derive(Debug, Clone)]
pub struct RateMeter {
    window_start: Instant,
    count: u32,
    last_rate: u32,
}

impl RateMeter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            count: 0,
            last_rate: 0,
        }
    }

    /// Record one event at `now`, rolling the window if a second has passed.
    pub fn record(&mut self, now: Instant) {
        while now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.last_rate = self.count;
            self.count = 0;
            self.window_start += Duration::from_secs(1);
        }
        self.count += 1;
    }

    /// The rate measured over the last completed window.
    pub fn per_second(&self) -> u32 {
        self.last_rate
    }
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::new()
    }
}
