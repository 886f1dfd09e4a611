//! Presentation and dismissal transitions, time- or gesture-driven.
//!
//! One state machine serves both modes: an interactive run takes its
//! progress from [`TransitionAnimator::update`] until it is released, after
//! which it animates on the clock like a programmatic run.

use std::rc::Weak;
use std::time::Duration;

use tachyonfx::Interpolation;
use tracing::{debug, error, trace};

use crate::domain::entities::{Rect, Size, destination_frame_for_source_frame, lerp};
use crate::domain::errors::TransitionError;
use crate::domain::ports::SourceView;

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// From the source view to fully presented.
    Presentation,
    /// From fully presented back to the source view.
    Dismissal,
}

/// Timing and release rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSettings {
    /// Length of a non-interactive presentation.
    pub presentation_duration: Duration,
    /// Length of a non-interactive dismissal.
    pub dismissal_duration: Duration,
    /// Progress at or past which a released gesture completes.
    pub completion_threshold: f64,
    /// Release velocity (points per second) that completes regardless of
    /// progress.
    pub velocity_threshold: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            presentation_duration: Duration::from_millis(300),
            dismissal_duration: Duration::from_millis(250),
            completion_threshold: 0.5,
            velocity_threshold: 800.0,
        }
    }
}

/// Geometry a transition works in.
#[derive(Clone, Default)]
pub struct TransitionContext {
    /// Full-screen container frame.
    pub container: Rect,
    /// Size of the current content, empty if unknown.
    pub content_size: Size,
    /// The view the content comes from and returns to.
    pub source_view: Option<Weak<dyn SourceView>>,
}

impl TransitionContext {
    /// Frame of the content when fully presented.
    #[must_use]
    pub fn presented_frame(&self) -> Rect {
        if self.content_size.is_empty() {
            self.container
        } else {
            self.container.aspect_fit(self.content_size)
        }
    }

    /// Frame of the content on top of the source view. `None` when there is
    /// no live source view and the transition fades instead.
    #[must_use]
    pub fn origin_frame(&self) -> Option<Rect> {
        let view = self.source_view.as_ref()?.upgrade()?;
        Some(destination_frame_for_source_frame(
            view.frame(),
            self.content_size,
            view.image_size(),
        ))
    }
}

/// What to draw during a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionLayout {
    /// Content frame.
    pub frame: Rect,
    /// Opacity of the content.
    pub content_alpha: f64,
    /// Opacity of the backdrop.
    pub background_alpha: f64,
}

impl TransitionLayout {
    /// Equality within float tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        const EPSILON: f64 = 1e-6;
        self.frame.approx_eq(&other.frame)
            && (self.content_alpha - other.content_alpha).abs() < EPSILON
            && (self.background_alpha - other.background_alpha).abs() < EPSILON
    }
}

/// Reported once when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEnded {
    /// Which transition ended.
    pub kind: TransitionKind,
    /// Whether it reached its end state.
    pub completed: bool,
}

/// Called exactly once per run with whether it completed.
pub type AnimationEndCallback = Box<dyn FnOnce(bool)>;

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

impl Tween {
    fn value(&self) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        #[allow(clippy::cast_possible_truncation)]
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32;
        lerp(self.from, self.to, f64::from(Interpolation::CircOut.alpha(t)))
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

struct Run {
    kind: TransitionKind,
    interactive: bool,
    context: TransitionContext,
    progress: f64,
    tween: Option<Tween>,
    on_end: Option<AnimationEndCallback>,
}

impl Run {
    /// 1.0 when fully presented, 0.0 when at the source view.
    fn presented_amount(&self) -> f64 {
        match self.kind {
            TransitionKind::Presentation => self.progress,
            TransitionKind::Dismissal => 1.0 - self.progress,
        }
    }

    fn layout(&self) -> TransitionLayout {
        let amount = self.presented_amount();
        let presented = self.context.presented_frame();
        match self.context.origin_frame() {
            Some(origin) => TransitionLayout {
                frame: origin.lerp(&presented, amount),
                content_alpha: 1.0,
                background_alpha: amount,
            },
            None => TransitionLayout {
                frame: presented,
                content_alpha: amount,
                background_alpha: amount,
            },
        }
    }
}

/// Drives one transition at a time.
pub struct TransitionAnimator {
    settings: TransitionSettings,
    run: Option<Run>,
}

impl TransitionAnimator {
    /// Creates an idle animator.
    #[must_use]
    pub const fn new(settings: TransitionSettings) -> Self {
        Self {
            settings,
            run: None,
        }
    }

    /// Timing and release rules.
    #[must_use]
    pub const fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    /// Whether a run is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Whether the active run takes its progress from a gesture.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.interactive)
    }

    /// Kind of the active run.
    #[must_use]
    pub fn kind(&self) -> Option<TransitionKind> {
        self.run.as_ref().map(|run| run.kind)
    }

    /// Progress of the active run in [0, 1].
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.run.as_ref().map(|run| run.progress)
    }

    /// Layout of the active run.
    #[must_use]
    pub fn layout(&self) -> Option<TransitionLayout> {
        self.run.as_ref().map(Run::layout)
    }

    /// Starts a run. Interactive runs wait for [`Self::update`]; others
    /// animate on [`Self::tick`].
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::AlreadyActive` while another run is active.
    pub fn begin(
        &mut self,
        kind: TransitionKind,
        interactive: bool,
        context: TransitionContext,
        on_end: Option<AnimationEndCallback>,
    ) -> Result<(), TransitionError> {
        if self.run.is_some() {
            error!(kind = ?kind, "Transition requested while another is running");
            return Err(TransitionError::AlreadyActive);
        }

        let tween = (!interactive).then(|| Tween {
            from: 0.0,
            to: 1.0,
            elapsed: Duration::ZERO,
            duration: self.duration(kind),
        });
        debug!(
            kind = ?kind,
            interactive,
            has_source = context.origin_frame().is_some(),
            "Transition started"
        );
        self.run = Some(Run {
            kind,
            interactive,
            context,
            progress: 0.0,
            tween,
            on_end,
        });
        Ok(())
    }

    /// Sets the progress of an interactive run, clamped to [0, 1].
    ///
    /// # Errors
    ///
    /// Fails when no run is active or the active run is not interactive.
    pub fn update(&mut self, percent: f64) -> Result<(), TransitionError> {
        let run = self.run.as_mut().ok_or(TransitionError::NotActive)?;
        if !run.interactive {
            return Err(TransitionError::NotInteractive);
        }
        run.progress = percent.clamp(0.0, 1.0);
        trace!(progress = run.progress, "Transition progress");
        Ok(())
    }

    /// Ends the gesture of an interactive run. The run then finishes
    /// forward when past the completion threshold or fast enough, and
    /// reverses otherwise. Returns whether it will complete.
    ///
    /// # Errors
    ///
    /// Fails when no run is active or the active run is not interactive.
    pub fn release(&mut self, velocity: f64) -> Result<bool, TransitionError> {
        let settings = self.settings;
        let run = self.run.as_mut().ok_or(TransitionError::NotActive)?;
        if !run.interactive {
            return Err(TransitionError::NotInteractive);
        }

        let completes = velocity >= settings.velocity_threshold
            || (run.progress >= settings.completion_threshold
                && velocity > -settings.velocity_threshold);
        let to = if completes { 1.0 } else { 0.0 };
        let full = match run.kind {
            TransitionKind::Presentation => settings.presentation_duration,
            TransitionKind::Dismissal => settings.dismissal_duration,
        };

        run.interactive = false;
        run.tween = Some(Tween {
            from: run.progress,
            to,
            elapsed: Duration::ZERO,
            duration: full.mul_f64((to - run.progress).abs()),
        });
        debug!(
            progress = run.progress,
            velocity, completes, "Interactive transition released"
        );
        Ok(completes)
    }

    /// Advances a time-driven run. Returns the end report when the run
    /// finishes during this tick; its callback has run by then.
    pub fn tick(&mut self, dt: Duration) -> Option<TransitionEnded> {
        let run = self.run.as_mut()?;
        let tween = run.tween.as_mut()?;
        tween.elapsed += dt;
        run.progress = tween.value();
        if !tween.is_done() {
            return None;
        }
        let completed = tween.to >= 1.0;
        self.finish(completed)
    }

    /// Ends the active run at once, snapped to where it started, reporting
    /// `completed = false`.
    pub fn force_cancel(&mut self) -> Option<TransitionEnded> {
        if let Some(run) = self.run.as_mut() {
            run.progress = 0.0;
        }
        self.finish(false)
    }

    fn finish(&mut self, completed: bool) -> Option<TransitionEnded> {
        let mut run = self.run.take()?;
        debug!(kind = ?run.kind, completed, "Transition ended");
        if let Some(on_end) = run.on_end.take() {
            on_end(completed);
        }
        Some(TransitionEnded {
            kind: run.kind,
            completed,
        })
    }

    const fn duration(&self, kind: TransitionKind) -> Duration {
        match kind {
            TransitionKind::Presentation => self.settings.presentation_duration,
            TransitionKind::Dismissal => self.settings.dismissal_duration,
        }
    }
}

impl Default for TransitionAnimator {
    fn default() -> Self {
        Self::new(TransitionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Thumbnail(Rect);

    impl SourceView for Thumbnail {
        fn frame(&self) -> Rect {
            self.0
        }
    }

    fn context(source: &Rc<dyn SourceView>) -> TransitionContext {
        TransitionContext {
            container: Rect::new(0.0, 0.0, 400.0, 800.0),
            content_size: Size::new(400.0, 200.0),
            source_view: Some(Rc::downgrade(source)),
        }
    }

    fn thumbnail() -> Rc<dyn SourceView> {
        Rc::new(Thumbnail(Rect::new(20.0, 40.0, 80.0, 80.0)))
    }

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, AnimationEndCallback) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&calls);
        (calls, Box::new(move |completed| seen.borrow_mut().push(completed)))
    }

    fn run_to_end(animator: &mut TransitionAnimator) -> Option<TransitionEnded> {
        for _ in 0..100 {
            if let Some(ended) = animator.tick(Duration::from_millis(16)) {
                return Some(ended);
            }
        }
        None
    }

    #[test]
    fn test_interactive_endpoints_match_layouts() {
        let source = thumbnail();
        let ctx = context(&source);
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Dismissal, true, ctx.clone(), None)
            .unwrap();

        let presented = animator.layout().unwrap();
        assert!(presented.frame.approx_eq(&ctx.presented_frame()));
        assert!((presented.background_alpha - 1.0).abs() < f64::EPSILON);

        animator.update(1.0).unwrap();
        let dismissed = animator.layout().unwrap();
        assert!(dismissed.frame.approx_eq(&Rect::new(20.0, 60.0, 80.0, 40.0)));
        assert!(dismissed.background_alpha.abs() < f64::EPSILON);
    }

    #[test]
    fn test_interactive_sweep_is_monotonic() {
        let source = thumbnail();
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Dismissal, true, context(&source), None)
            .unwrap();

        let mut last_width = f64::MAX;
        let mut last_alpha = f64::MAX;
        for step in 0..=20 {
            animator.update(f64::from(step) / 20.0).unwrap();
            let layout = animator.layout().unwrap();
            assert!(layout.frame.width() <= last_width);
            assert!(layout.background_alpha <= last_alpha);
            last_width = layout.frame.width();
            last_alpha = layout.background_alpha;
        }
    }

    #[test]
    fn test_release_below_threshold_restores_presented_layout() {
        let source = thumbnail();
        let ctx = context(&source);
        let (calls, on_end) = recorder();
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Dismissal, true, ctx.clone(), Some(on_end))
            .unwrap();
        let resting = animator.layout().unwrap();

        animator.update(0.2).unwrap();
        assert!(!animator.release(10.0).unwrap());
        let ended = run_to_end(&mut animator).unwrap();

        assert!(!ended.completed);
        assert_eq!(*calls.borrow(), vec![false]);
        assert!(!animator.is_active());

        animator
            .begin(TransitionKind::Dismissal, true, ctx, None)
            .unwrap();
        assert!(animator.layout().unwrap().approx_eq(&resting));
    }

    #[test]
    fn test_release_past_threshold_completes() {
        let source = thumbnail();
        let (calls, on_end) = recorder();
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Dismissal, true, context(&source), Some(on_end))
            .unwrap();

        animator.update(0.6).unwrap();
        assert!(animator.release(0.0).unwrap());
        let ended = run_to_end(&mut animator).unwrap();

        assert!(ended.completed);
        assert_eq!(*calls.borrow(), vec![true]);
    }

    #[test]
    fn test_fast_flick_completes_below_threshold() {
        let source = thumbnail();
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Dismissal, true, context(&source), None)
            .unwrap();
        animator.update(0.1).unwrap();

        assert!(animator.release(1200.0).unwrap());
    }

    #[test]
    fn test_second_transition_is_rejected() {
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Presentation, false, TransitionContext::default(), None)
            .unwrap();

        let result = animator.begin(
            TransitionKind::Dismissal,
            true,
            TransitionContext::default(),
            None,
        );

        assert_eq!(result, Err(TransitionError::AlreadyActive));
        assert_eq!(animator.kind(), Some(TransitionKind::Presentation));
    }

    #[test]
    fn test_programmatic_run_rejects_gesture_updates() {
        let mut animator = TransitionAnimator::default();
        assert_eq!(animator.update(0.5), Err(TransitionError::NotActive));

        animator
            .begin(TransitionKind::Presentation, false, TransitionContext::default(), None)
            .unwrap();
        assert_eq!(animator.update(0.5), Err(TransitionError::NotInteractive));
        assert_eq!(animator.release(0.0), Err(TransitionError::NotInteractive));
    }

    #[test]
    fn test_presentation_without_source_fades() {
        let (calls, on_end) = recorder();
        let ctx = TransitionContext {
            container: Rect::new(0.0, 0.0, 100.0, 100.0),
            ..TransitionContext::default()
        };
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Presentation, false, ctx.clone(), Some(on_end))
            .unwrap();

        let start = animator.layout().unwrap();
        assert!(start.frame.approx_eq(&ctx.container));
        assert!(start.content_alpha.abs() < f64::EPSILON);

        animator.tick(Duration::from_millis(150));
        let middle = animator.layout().unwrap();
        assert!(middle.content_alpha > 0.0 && middle.content_alpha < 1.0);

        let ended = run_to_end(&mut animator).unwrap();
        assert_eq!(ended.kind, TransitionKind::Presentation);
        assert!(ended.completed);
        assert_eq!(*calls.borrow(), vec![true]);
    }

    #[test]
    fn test_dropped_source_view_falls_back_to_fade() {
        let source = thumbnail();
        let ctx = context(&source);
        drop(source);

        assert!(ctx.origin_frame().is_none());
    }

    #[test]
    fn test_force_cancel_fires_callback_once() {
        let (calls, on_end) = recorder();
        let mut animator = TransitionAnimator::default();
        animator
            .begin(TransitionKind::Dismissal, true, TransitionContext::default(), Some(on_end))
            .unwrap();
        animator.update(0.7).unwrap();

        let ended = animator.force_cancel().unwrap();

        assert!(!ended.completed);
        assert!(animator.force_cancel().is_none());
        assert!(animator.tick(Duration::from_secs(1)).is_none());
        assert_eq!(*calls.borrow(), vec![false]);
    }
}
