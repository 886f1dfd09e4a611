//! Navigation bar and caption footer visibility.

use std::time::Duration;

use tracing::trace;

/// Length of the show/hide fade.
pub const FADE_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    elapsed: Duration,
}

/// Visibility of the views around the content.
#[derive(Debug, Clone)]
pub struct SecondaryViews {
    visible: bool,
    alpha: f64,
    fade: Option<Fade>,
}

impl Default for SecondaryViews {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 1.0,
            fade: None,
        }
    }
}

impl SecondaryViews {
    /// Starts shown or hidden without a fade.
    #[must_use]
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            alpha: if visible { 1.0 } else { 0.0 },
            fade: None,
        }
    }

    /// Target visibility.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a fade is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.fade.is_some()
    }

    /// Shows or hides, fading when `animated`.
    pub fn set_visible(&mut self, visible: bool, animated: bool) {
        if visible == self.visible && self.fade.is_none() {
            return;
        }
        trace!(visible, animated, "Secondary views visibility");
        self.visible = visible;
        let target = if visible { 1.0 } else { 0.0 };
        if animated {
            self.fade = Some(Fade {
                from: self.alpha,
                to: target,
                elapsed: Duration::ZERO,
            });
        } else {
            self.fade = None;
            self.alpha = target;
        }
    }

    /// Advances the fade.
    pub fn tick(&mut self, dt: Duration) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        fade.elapsed += dt;
        let t = (fade.elapsed.as_secs_f64() / FADE_DURATION.as_secs_f64()).min(1.0);
        self.alpha = fade.from + (fade.to - fade.from) * t;
        if t >= 1.0 {
            self.fade = None;
        }
    }

    /// Opacity of the navigation bar.
    #[must_use]
    pub const fn navigation_alpha(&self) -> f64 {
        self.alpha
    }

    /// Opacity of the caption footer; hidden when the content wants it gone.
    #[must_use]
    pub const fn footer_alpha(&self, content_prefers_hidden: bool) -> f64 {
        if content_prefers_hidden { 0.0 } else { self.alpha }
    }
}

/// "N of M" for the navigation bar.
#[must_use]
pub fn navigation_title(index: Option<usize>, count: usize) -> Option<String> {
    let index = index?;
    (count > 0).then(|| format!("{} of {count}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animated_hide_fades_out() {
        let mut views = SecondaryViews::new(true);
        views.set_visible(false, true);
        assert!(!views.is_visible());
        assert!((views.navigation_alpha() - 1.0).abs() < f64::EPSILON);

        views.tick(Duration::from_millis(100));
        assert!((views.navigation_alpha() - 0.5).abs() < 1e-9);

        views.tick(Duration::from_millis(150));
        assert!(views.navigation_alpha().abs() < f64::EPSILON);
        assert!(!views.is_animating());
    }

    #[test]
    fn test_reversing_mid_fade_starts_from_current_alpha() {
        let mut views = SecondaryViews::new(true);
        views.set_visible(false, true);
        views.tick(Duration::from_millis(100));
        views.set_visible(true, true);
        views.tick(Duration::from_millis(100));
        assert!((views.navigation_alpha() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_footer_hidden_for_movies() {
        let views = SecondaryViews::new(true);
        assert!(views.footer_alpha(true).abs() < f64::EPSILON);
        assert!((views.footer_alpha(false) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_navigation_title() {
        assert_eq!(navigation_title(Some(1), 5).as_deref(), Some("2 of 5"));
        assert_eq!(navigation_title(None, 0), None);
    }
}
