use std::time::{Duration, Instant};

/// Frames-per-second counter over wall-clock time since the loop started.
#[derive(Clone, Debug)]
pub struct FpsCounter {
    start: Instant,
    frames: u64,
}

impl FpsCounter {
    pub fn start() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start, frames: 0 }
    }

    /// Count one frame and return the average rate so far.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        rate(self.frames, now.saturating_duration_since(self.start))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Average rate at the current instant without counting a frame.
    pub fn current(&self) -> f64 {
        rate(self.frames, self.elapsed())
    }
}

/// `frames / elapsed`, or 0 when no time has passed.
pub fn rate(frames: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        frames as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_uses_elapsed_time() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        fps.tick_at(start + Duration::from_millis(500));
        let value = fps.tick_at(start + Duration::from_secs(1));
        assert_eq!(fps.frames(), 2);
        assert!((value - 2.0).abs() < 1e-9);

        let slower = fps.tick_at(start + Duration::from_secs(3));
        assert!((slower - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_is_zero_not_infinite() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        assert_eq!(fps.tick_at(start), 0.0);
    }

    #[test]
    fn never_negative() {
        let start = Instant::now() + Duration::from_secs(5);
        let mut fps = FpsCounter::starting_at(start);
        // a clock reading before the start saturates to zero elapsed
        let value = fps.tick_at(Instant::now());
        assert!(value >= 0.0);
        assert!(fps.current() >= 0.0);
    }
}
