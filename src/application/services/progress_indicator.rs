//! Keyframes of the circular download progress indicator.
//!
//! The arc starts at 12 o'clock (-90°) and grows clockwise. Each progress
//! update animates from the previous target angle to the new one.

use std::time::Duration;

use tachyonfx::Interpolation;

/// Length of one progress animation.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(320);

const FRAMES_PER_SECOND: f64 = 60.0;
const START_ANGLE: f64 = -90.0;

/// Arc end angle in degrees for a progress fraction.
#[must_use]
pub fn destination_angle(progress: f64) -> f64 {
    360.0 * progress - 90.0
}

/// Keyframed arc animation.
#[derive(Debug, Clone)]
pub struct ProgressIndicator {
    progress: f64,
    last_angle: f64,
    keyframes: Vec<f64>,
    elapsed: Duration,
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self {
            progress: 0.0,
            last_angle: START_ANGLE,
            keyframes: vec![START_ANGLE],
            elapsed: ANIMATION_DURATION,
        }
    }
}

impl ProgressIndicator {
    /// Starts empty at 12 o'clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target progress.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Sets a new target and restarts the animation towards it.
    pub fn set_progress(&mut self, progress: f64) {
        let progress = progress.clamp(0.0, 1.0);
        let target = destination_angle(progress);
        self.keyframes = keyframes(self.last_angle, target);
        self.last_angle = target;
        self.progress = progress;
        self.elapsed = Duration::ZERO;
    }

    /// Advances the animation.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(ANIMATION_DURATION);
    }

    /// Whether keyframes remain to play.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.elapsed < ANIMATION_DURATION
    }

    /// Keyframes of the running animation.
    #[must_use]
    pub fn keyframes(&self) -> &[f64] {
        &self.keyframes
    }

    /// Arc end angle on screen now, in degrees.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn angle(&self) -> f64 {
        let last = self.keyframes.len().saturating_sub(1);
        let t = (self.elapsed.as_secs_f64() / ANIMATION_DURATION.as_secs_f64()).clamp(0.0, 1.0);
        let eased = f64::from(Interpolation::QuadOut.alpha(t as f32));
        let frame = (eased * last as f64).round() as usize;
        self.keyframes
            .get(frame.min(last))
            .copied()
            .unwrap_or(self.last_angle)
    }

    /// Fraction of the circle filled on screen now.
    #[must_use]
    pub fn displayed_fraction(&self) -> f64 {
        ((self.angle() - START_ANGLE) / 360.0).clamp(0.0, 1.0)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn keyframes(from: f64, to: f64) -> Vec<f64> {
    let frame_count = (ANIMATION_DURATION.as_secs_f64() * FRAMES_PER_SECOND).ceil() as usize;
    (0..=frame_count)
        .map(|frame| from + (to - from) * frame as f64 / frame_count as f64)
        .collect()
}
