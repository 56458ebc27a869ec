//! Per-frame delta time and elapsed scene time.

use std::time::Instant;
use tracing::warn;

/// Longest frame step handed to the simulation and camera.
pub const MAX_DT: f32 = 0.1;
/// Step used when the measured delta is zero or negative.
pub const FALLBACK_DT: f32 = 1.0 / 60.0;

/// Clamp a raw frame delta into `(0, MAX_DT]`.
pub fn clamp_dt(raw: f32) -> f32 {
    if !(raw > 0.0) {
        FALLBACK_DT
    } else if raw > MAX_DT {
        warn!(
            "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
            raw * 1000.0,
            MAX_DT * 1000.0
        );
        MAX_DT
    } else {
        raw
    }
}

pub struct FrameClock {
    start: Instant,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            last: None,
        }
    }

    /// Clamped delta since the previous tick. The first tick returns [`FALLBACK_DT`].
    pub fn tick(&mut self, now: Instant) -> f32 {
        let raw = self
            .last
            .replace(now)
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        clamp_dt(raw)
    }

    /// Seconds since the clock was created, for cloud advection.
    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(0.5), MAX_DT);
        assert_eq!(clamp_dt(0.0), FALLBACK_DT);
        assert_eq!(clamp_dt(-1.0), FALLBACK_DT);
        assert_eq!(clamp_dt(f32::NAN), FALLBACK_DT);
    }

    #[test]
    fn test_tick_measures_between_calls() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        assert_eq!(clock.tick(t0), FALLBACK_DT);

        let dt = clock.tick(t0 + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        clock.tick(t0);
        assert_eq!(clock.tick(t0 + Duration::from_secs(3)), MAX_DT);
    }

    #[test]
    fn test_elapsed_is_monotonic_from_start() {
        let t0 = Instant::now();
        let clock = FrameClock::new(t0);
        assert_eq!(clock.elapsed(t0), 0.0);
        assert!((clock.elapsed(t0 + Duration::from_millis(1500)) - 1.5).abs() < 1e-4);
    }
}
