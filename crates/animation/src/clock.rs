use std::time::{Duration, Instant};

/// Monotonic scene clock: seconds elapsed since the scene started.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            frames: 0,
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Mark a new frame. Returns `(elapsed, frame_delta)` in seconds, with the
    /// delta capped at `max_delta` so a stalled window does not produce a jump.
    pub fn tick(&mut self, max_delta: Duration) -> (f32, f32) {
        let now = Instant::now();
        let delta = (now - self.last_frame).min(max_delta);
        self.last_frame = now;
        self.frames += 1;
        ((now - self.start).as_secs_f32(), delta.as_secs_f32())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Times for a fixed-rate replay of `frames` frames starting at `start` seconds.
pub fn fixed_timeline(start: f32, fps: f32, frames: usize) -> impl Iterator<Item = f32> {
    let dt = if fps > 0.0 { 1.0 / fps } else { 0.0 };
    (0..frames).map(move |i| start + i as f32 * dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let (t0, _) = clock.tick(Duration::from_millis(100));
        std::thread::sleep(Duration::from_millis(2));
        let (t1, dt) = clock.tick(Duration::from_millis(100));
        assert!(t1 >= t0);
        assert!(dt > 0.0 && dt <= 0.1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn delta_is_capped() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let (_, dt) = clock.tick(Duration::from_millis(1));
        assert!(dt <= 0.001 + 1e-6);
    }

    #[test]
    fn timeline_steps_at_fps() {
        let times: Vec<f32> = fixed_timeline(1.0, 4.0, 3).collect();
        assert_eq!(times, vec![1.0, 1.25, 1.5]);
        assert_eq!(fixed_timeline(0.0, 0.0, 2).collect::<Vec<_>>(), vec![0.0, 0.0]);
    }
}
