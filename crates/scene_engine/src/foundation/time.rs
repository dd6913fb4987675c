//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-rate tick clock for the animation and physics loops
///
/// Both loops run at a nominal 16 ms period on the same thread; the clock
/// accumulates real elapsed time and reports how many fixed steps are due.
/// Steps are capped per poll so a long stall cannot produce an unbounded
/// catch-up burst.
pub struct TickClock {
    period: Duration,
    accumulator: Duration,
    last_poll: Instant,
    max_steps_per_poll: u32,
}

impl TickClock {
    /// Nominal tick period for animation and physics (~60 Hz)
    pub const DEFAULT_PERIOD_MS: u64 = 16;

    /// Create a clock with the default 16 ms period
    pub fn new() -> Self {
        Self::with_period(Duration::from_millis(Self::DEFAULT_PERIOD_MS))
    }

    /// Create a clock with a custom period
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            accumulator: Duration::ZERO,
            last_poll: Instant::now(),
            max_steps_per_poll: 5,
        }
    }

    /// Fixed timestep in seconds for each due tick
    pub fn step_seconds(&self) -> f32 {
        self.period.as_secs_f32()
    }

    /// Accumulate elapsed wall time and return the number of ticks now due
    pub fn due_steps(&mut self) -> u32 {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last_poll);
        self.last_poll = now;

        let mut steps = 0;
        while self.accumulator >= self.period && steps < self.max_steps_per_poll {
            self.accumulator -= self.period;
            steps += 1;
        }
        if steps == self.max_steps_per_poll {
            // Drop the backlog rather than spiral
            self.accumulator = Duration::ZERO;
        }
        steps
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
