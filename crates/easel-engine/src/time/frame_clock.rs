use std::time::{Duration, Instant};

/// Delta reported before the first tick (one frame at 60 Hz).
pub const IDEAL_FRAME_TIME: f32 = 1.0 / 60.0;

/// Smallest delta ever reported, in seconds.
pub const MIN_DELTA_TIME: f64 = 0.000_01;

/// Largest delta ever reported, in seconds.
pub const MAX_DELTA_TIME: f64 = 0.5;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing clamped delta times.
///
/// Delta time is clamped into `[MIN_DELTA_TIME, MAX_DELTA_TIME]` so consumers
/// never divide by a zero-length frame and never see a huge jump after a
/// debugger pause or a window-drag stall.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    dt: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock whose first delta is measured from `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            dt: IDEAL_FRAME_TIME,
            frame_index: 0,
            dt_min: Duration::from_secs_f64(MIN_DELTA_TIME),
            dt_max: Duration::from_secs_f64(MAX_DELTA_TIME),
        }
    }

    /// Creates a clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Advances the clock using the current time.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now` and returns the new snapshot.
    ///
    /// A `now` earlier than the previous sample counts as a zero-length frame.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.dt = dt.as_secs_f32();
        self.frame_index = self.frame_index.wrapping_add(1);

        self.snapshot()
    }

    /// Last clamped delta time in seconds.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Number of ticks so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the current state without advancing.
    pub fn snapshot(&self) -> FrameTime {
        FrameTime {
            dt: self.dt,
            now: self.last,
            frame_index: self.frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
