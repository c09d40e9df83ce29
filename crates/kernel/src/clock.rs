use std::time::Duration;

/// Converts host timestamps into clamped per-tick deltas.
///
/// The first tick measures from time zero, like every later tick measures
/// from the one before it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: f32,
    time: f32,
    delta: f32,
    frame: u64,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            max_delta,
            time: 0.0,
            delta: 0.0,
            frame: 0,
        }
    }

    /// Advance to the host timestamp `now_ms` (milliseconds) and return the
    /// clamped delta in seconds. Timestamps going backwards give a zero delta;
    /// a non-finite timestamp gives a zero delta and leaves the time unchanged.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let time = (now_ms * 0.001) as f32;
        if time.is_finite() {
            self.delta = (time - self.time).clamp(0.0, self.max_delta);
            self.time = time;
        } else {
            tracing::warn!(now_ms, "non-finite host timestamp ignored");
            self.delta = 0.0;
        }
        self.frame += 1;
        self.delta
    }

    /// Seconds at the latest tick.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Ticks so far; 1 during the first tick.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

/// Rolling window of recent frame deltas.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn record_secs(&mut self, dt: f32) {
        self.record(Duration::from_secs_f32(dt.max(0.0)));
    }

    fn window(&self) -> &[Duration] {
        if self.filled {
            &self.history
        } else {
            &self.history[..self.index]
        }
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        self.window().len()
    }

    /// Frames per second implied by the average delta; zero before any
    /// non-zero sample.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_time_since_previous_tick() {
        let mut clock = FrameClock::new(0.05);
        assert!((clock.advance(16.0) - 0.016).abs() < 1e-6);
        assert!((clock.advance(48.0) - 0.032).abs() < 1e-6);
        assert!((clock.time() - 0.048).abs() < 1e-6);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn delta_is_clamped_to_max() {
        let mut clock = FrameClock::new(0.05);
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), 0.05);
        assert!((clock.time() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn delta_never_negative() {
        let mut clock = FrameClock::new(0.05);
        clock.advance(1_000.0);
        assert_eq!(clock.advance(900.0), 0.0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn non_finite_timestamp_keeps_previous_time() {
        let mut clock = FrameClock::new(0.05);
        clock.advance(1_000.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert!((clock.time() - 1.0).abs() < 1e-6);
        assert_eq!(clock.frame(), 2);
        assert_eq!(clock.advance(f64::INFINITY), 0.0);
        assert!((clock.advance(1_016.0) - 0.016).abs() < 1e-6);
        assert!((clock.time() - 1.016).abs() < 1e-6);
    }

    #[test]
    fn frame_timer_tracks_stats() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn fps_from_average() {
        let mut timer = FrameTimer::new(4);
        timer.record_secs(0.025);
        timer.record_secs(0.025);
        assert!((timer.fps() - 40.0).abs() < 0.01);
    }
}
