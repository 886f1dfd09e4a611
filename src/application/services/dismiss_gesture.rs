//! Vertical swipe-to-dismiss tracking.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Samples older than this do not count towards velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Estimates velocity from recent position samples.
#[derive(Debug, Default, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f64)>,
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample, dropping those older than the window.
    pub fn add(&mut self, at: Instant, position: f64) {
        self.samples.push_back((at, position));
        while let Some((oldest, _)) = self.samples.front() {
            if at.saturating_duration_since(*oldest) > VELOCITY_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Points per second over the retained samples; 0 with fewer than two.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let (Some((first_at, first)), Some((last_at, last))) =
            (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let elapsed = last_at.saturating_duration_since(*first_at).as_secs_f64();
        if elapsed <= f64::EPSILON {
            return 0.0;
        }
        (last - first) / elapsed
    }

    /// Drops all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Turns a vertical drag into dismissal progress.
///
/// Progress is the downward translation over half the container height.
#[derive(Debug, Clone)]
pub struct DismissGesture {
    start: f64,
    half_height: f64,
    tracker: VelocityTracker,
}

impl DismissGesture {
    /// Starts tracking at `y` in a container of `container_height`.
    #[must_use]
    pub fn begin(at: Instant, y: f64, container_height: f64) -> Self {
        let mut tracker = VelocityTracker::new();
        tracker.add(at, y);
        Self {
            start: y,
            half_height: (container_height / 2.0).max(1.0),
            tracker,
        }
    }

    /// Records a move and returns the progress in [0, 1].
    pub fn update(&mut self, at: Instant, y: f64) -> f64 {
        self.tracker.add(at, y);
        self.percent(y)
    }

    /// Progress for position `y`.
    #[must_use]
    pub fn percent(&self, y: f64) -> f64 {
        ((y - self.start) / self.half_height).clamp(0.0, 1.0)
    }

    /// Release velocity in points per second, positive downwards.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.tracker.velocity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_uses_recent_samples_only() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.add(start, 0.0);
        tracker.add(start + Duration::from_millis(500), 0.0);
        tracker.add(start + Duration::from_millis(550), 50.0);

        assert!((tracker.velocity() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_sample_has_no_velocity() {
        let mut tracker = VelocityTracker::new();
        tracker.add(Instant::now(), 10.0);
        assert!(tracker.velocity().abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_over_half_height() {
        let start = Instant::now();
        let mut gesture = DismissGesture::begin(start, 100.0, 800.0);

        assert!((gesture.update(start + Duration::from_millis(10), 300.0) - 0.5).abs() < 1e-9);
        assert!(gesture.update(start + Duration::from_millis(20), 50.0).abs() < 1e-9);
        assert!((gesture.update(start + Duration::from_millis(30), 900.0) - 1.0).abs() < 1e-9);
    }
}
