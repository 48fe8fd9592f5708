use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock started (sum of clamped deltas).
    pub elapsed: f32,

    /// Zero-based index of this frame.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots for a render loop.
///
/// Delta time is clamped so a stall (debugger, minimized window) does not
/// produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: Duration,
    frame_index: u64,
}

impl FrameClock {
    pub const DT_MIN: Duration = Duration::from_micros(100);
    pub const DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            elapsed: Duration::ZERO,
            frame_index: 0,
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(Self::DT_MIN, Self::DT_MAX);

        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
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
    fn frame_index_counts_from_zero() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_millis(16)).frame_index, 0);
        assert_eq!(clock.tick_at(start + Duration::from_millis(32)).frame_index, 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let ft = clock.tick_at(start + Duration::from_secs(10));
        assert_eq!(ft.dt, FrameClock::DT_MAX.as_secs_f32());
        assert_eq!(ft.elapsed, ft.dt);
    }

    #[test]
    fn zero_delta_is_raised_to_minimum() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let ft = clock.tick_at(start);
        assert_eq!(ft.dt, FrameClock::DT_MIN.as_secs_f32());
    }

    #[test]
    fn elapsed_accumulates() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.tick_at(start + Duration::from_millis(100));
        let ft = clock.tick_at(start + Duration::from_millis(200));
        assert!((ft.elapsed - 0.2).abs() < 1e-6);
    }
}
