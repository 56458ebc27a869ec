//! FPS and frame time averaged over short windows.

/// Length of one averaging window in seconds.
pub const STATS_WINDOW: f32 = 0.5;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameStats {
    elapsed: f32,
    frames: u32,
    fps: f32,
    frame_ms: f32,
    /// Raymarch resolution of the latest frame.
    pub march_size: (u32, u32),
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame. Published values change once per window.
    pub fn record(&mut self, dt: f32) {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed >= STATS_WINDOW {
            self.fps = self.frames as f32 / self.elapsed;
            self.frame_ms = self.elapsed * 1000.0 / self.frames as f32;
            self.elapsed = 0.0;
            self.frames = 0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_published_before_first_window() {
        let mut stats = FrameStats::new();
        stats.record(0.1);
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_average_over_window() {
        let mut stats = FrameStats::new();
        for _ in 0..31 {
            stats.record(1.0 / 60.0);
        }
        assert!((stats.fps() - 60.0).abs() < 0.5, "fps {}", stats.fps());
        assert!((stats.frame_ms() - 16.667).abs() < 0.1);
    }

    #[test]
    fn test_window_restarts() {
        let mut stats = FrameStats::new();
        for _ in 0..4 {
            stats.record(0.125);
        }
        let first = stats.fps();
        for _ in 0..2 {
            stats.record(0.25);
        }
        assert!((first - 8.0).abs() < 1e-3);
        assert!((stats.fps() - 4.0).abs() < 0.1);
    }
}
