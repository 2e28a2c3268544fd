use std::time::{Duration, Instant};

/// Timing of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Seconds since the clock was created or reset, as the sum of clamped `dt`s.
    pub elapsed: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Per-window frame clock.
///
/// `dt` is clamped to `[dt_min, dt_max]` so a debugger pause or a minimized
/// window does not produce one huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock clamped to 0.1 ms ..= 250 ms.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts the baseline, e.g. after the surface was reconfigured.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.elapsed = 0.0;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();

        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_both_ways() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let start = clock.last;

        let ft = clock.tick_at(start);
        assert!((ft.dt - 0.001).abs() < 1e-6);

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn frame_index_and_elapsed_advance() {
        let mut clock = FrameClock::new();
        let start = clock.last;

        let a = clock.tick_at(start + Duration::from_millis(10));
        let b = clock.tick_at(start + Duration::from_millis(30));

        assert_eq!((a.frame_index, b.frame_index), (0, 1));
        assert!((b.elapsed - 0.03).abs() < 1e-5);
    }
}
