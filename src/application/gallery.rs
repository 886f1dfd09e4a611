//! The embeddable gallery: paging, presentation and dismissal in one place.
//!
//! Everything here runs on the foreground context. The host feeds input,
//! calls [`Gallery::pump`] to apply loader callbacks and [`Gallery::tick`]
//! to advance animations, then draws from the accessors.

use std::rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::services::dismiss_gesture::DismissGesture;
use super::services::paging_controller::PagingController;
use super::services::secondary_views::{SecondaryViews, navigation_title};
use super::services::transition_animator::{
    AnimationEndCallback, TransitionAnimator, TransitionContext, TransitionEnded, TransitionKind,
    TransitionLayout, TransitionSettings,
};
use crate::domain::entities::{AttributedText, ItemRef, Rect, Size};
use crate::domain::errors::TransitionError;
use crate::domain::ports::{ContentLoaderPort, GalleryDataSource, GalleryDelegate, SourceView};

/// Behaviour switches of a gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GallerySettings {
    /// Horizontal gap between pages.
    pub item_spacing: f64,
    /// Show "N of M" as the navigation title.
    pub displays_navigation_item_count: bool,
    /// Show the secondary views once presentation finishes.
    pub should_automatically_display_secondary_views: bool,
    /// When false every transition completes on the next tick.
    pub animations_enabled: bool,
    /// Presentation and dismissal timing.
    pub transition: TransitionSettings,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            item_spacing: 10.0,
            displays_navigation_item_count: false,
            should_automatically_display_secondary_views: true,
            animations_enabled: true,
            transition: TransitionSettings::default(),
        }
    }
}

/// Where the gallery is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationState {
    /// Not yet presented.
    #[default]
    Hidden,
    /// The presentation transition is running.
    Presenting,
    /// On screen and idle.
    Presented,
    /// A dismissal transition is running.
    Dismissing,
    /// Dismissed; the host may drop the gallery.
    Dismissed,
}

impl PresentationState {
    /// Whether the gallery occupies the screen.
    #[must_use]
    pub const fn is_on_screen(self) -> bool {
        !matches!(self, Self::Hidden | Self::Dismissed)
    }
}

/// What triggered a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissSender {
    /// The close button of the navigation bar.
    CloseButton,
    /// A key press.
    Keyboard,
    /// Host code.
    Programmatic,
}

/// Who handles a dismissal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// The delegate took over for a custom content page.
    CustomContent,
    /// The delegate took over.
    Delegate,
    /// The gallery started its own dismissal transition.
    Animated,
    /// Nothing to dismiss right now.
    Ignored,
}

/// Everything the host needs to draw a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryLayout {
    /// Where the current page's content sits.
    pub content_frame: Rect,
    /// Opacity of the content.
    pub content_alpha: f64,
    /// Opacity of the backdrop.
    pub background_alpha: f64,
    /// Opacity of the navigation bar.
    pub navigation_alpha: f64,
    /// Opacity of the caption.
    pub footer_alpha: f64,
}

/// A paged media gallery.
pub struct Gallery {
    settings: GallerySettings,
    loader: Arc<dyn ContentLoaderPort>,
    paging: PagingController,
    animator: TransitionAnimator,
    secondary: SecondaryViews,
    state: PresentationState,
    container: Rect,
    gesture: Option<DismissGesture>,
    secondary_before_gesture: bool,
}

impl Gallery {
    /// Creates a hidden gallery. The gallery keeps `loader` alive; pages
    /// only hold weak references to it.
    #[must_use]
    pub fn new(loader: Arc<dyn ContentLoaderPort>, settings: GallerySettings) -> Self {
        let paging = PagingController::new(Arc::downgrade(&loader), settings.item_spacing);
        let mut transition = settings.transition;
        if !settings.animations_enabled {
            transition.presentation_duration = Duration::ZERO;
            transition.dismissal_duration = Duration::ZERO;
        }
        Self {
            settings,
            loader,
            paging,
            animator: TransitionAnimator::new(transition),
            secondary: SecondaryViews::new(false),
            state: PresentationState::Hidden,
            container: Rect::ZERO,
            gesture: None,
            secondary_before_gesture: false,
        }
    }

    /// Sets the item source. Held weakly.
    pub fn set_data_source(&mut self, source: rc::Weak<dyn GalleryDataSource>) {
        self.paging.set_data_source(source);
    }

    /// Sets the delegate. Held weakly.
    pub fn set_delegate(&mut self, delegate: rc::Weak<dyn GalleryDelegate>) {
        self.paging.set_delegate(delegate);
    }

    /// Settings the gallery was built with.
    #[must_use]
    pub const fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    /// The loader pages fetch through.
    #[must_use]
    pub fn loader(&self) -> &Arc<dyn ContentLoaderPort> {
        &self.loader
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PresentationState {
        self.state
    }

    /// Paging state.
    #[must_use]
    pub const fn paging(&self) -> &PagingController {
        &self.paging
    }

    /// Mutable paging state.
    pub fn paging_mut(&mut self) -> &mut PagingController {
        &mut self.paging
    }

    /// Transition state.
    #[must_use]
    pub const fn animator(&self) -> &TransitionAnimator {
        &self.animator
    }

    /// Navigation bar and caption visibility.
    #[must_use]
    pub const fn secondary_views(&self) -> &SecondaryViews {
        &self.secondary
    }

    /// Full-screen frame.
    #[must_use]
    pub const fn container(&self) -> Rect {
        self.container
    }

    /// Sets the full-screen frame the gallery lays out in.
    pub const fn set_container(&mut self, container: Rect) {
        self.container = container;
    }

    /// Re-queries the data source.
    pub fn reload_data(&mut self) {
        self.paging.reload_data();
    }

    /// Jumps to `item` without scroll notifications.
    pub fn set_current_item(&mut self, item: &ItemRef) -> bool {
        self.paging.set_current_item(item)
    }

    /// Applies queued loader callbacks. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        self.paging.process_events()
    }

    /// Pages to the previous or next item.
    pub fn page_by(&mut self, delta: isize) -> bool {
        if self.state != PresentationState::Presented {
            return false;
        }
        let Some(index) = self
            .paging
            .current_index()
            .and_then(|index| index.checked_add_signed(delta))
        else {
            return false;
        };
        self.paging.commit_page(index)
    }

    /// Starts a fresh load of the current page.
    pub fn retry_current(&mut self) -> bool {
        self.paging.retry_current()
    }

    /// Zooms the current page.
    pub fn set_zoom_scale(&mut self, scale: f64) {
        if let Some(provider) = self.paging.current_provider_mut() {
            provider.content_view_mut().set_zoom_scale(scale);
        }
    }

    /// Presents the gallery from the delegate's source view, or fades in
    /// when there is none.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::AlreadyActive` while a transition runs.
    pub fn present(&mut self, on_end: Option<AnimationEndCallback>) -> Result<(), TransitionError> {
        if self.animator.is_active() {
            return Err(TransitionError::AlreadyActive);
        }
        if self.state.is_on_screen() {
            warn!(state = ?self.state, "Gallery is already presented");
            return Ok(());
        }

        let source_view = self.source_view(None);
        let context = self.transition_context(source_view);
        self.animator
            .begin(TransitionKind::Presentation, false, context, on_end)?;
        self.secondary.set_visible(false, false);
        self.paging.set_on_screen(true);
        self.state = PresentationState::Presenting;
        info!(
            index = ?self.paging.current_index(),
            count = self.paging.number_of_items(),
            "Presenting gallery"
        );
        Ok(())
    }

    /// Handles a dismissal request.
    ///
    /// A custom current page is offered to the delegate's custom-content
    /// hook first, then the delegate's dismiss hook is asked, and only then
    /// does the gallery dismiss itself.
    pub fn dismiss(&mut self, sender: DismissSender) -> DismissOutcome {
        if self.state != PresentationState::Presented || self.animator.is_active() {
            debug!(sender = ?sender, state = ?self.state, "Dismissal ignored");
            return DismissOutcome::Ignored;
        }

        let delegate = self.paging.delegate();
        if let Some(delegate) = &delegate {
            if let Some(provider) = self
                .paging
                .current_provider()
                .filter(|provider| provider.is_custom())
                && delegate
                    .should_be_dismissed_with_custom_content(provider)
                    .is_implemented()
            {
                info!(sender = ?sender, "Delegate dismisses custom content");
                return DismissOutcome::CustomContent;
            }
            if delegate
                .should_be_dismissed_animated(self.settings.animations_enabled)
                .is_implemented()
            {
                info!(sender = ?sender, "Delegate dismisses gallery");
                return DismissOutcome::Delegate;
            }
        }

        match self.start_dismissal(None) {
            Ok(()) => {
                info!(sender = ?sender, "Dismissing gallery");
                DismissOutcome::Animated
            }
            Err(error) => {
                warn!(error = %error, "Could not start dismissal");
                DismissOutcome::Ignored
            }
        }
    }

    /// Runs the gallery's own dismissal transition back to the source view
    /// of the current item.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::AlreadyActive` while a transition runs.
    pub fn start_dismissal(
        &mut self,
        on_end: Option<AnimationEndCallback>,
    ) -> Result<(), TransitionError> {
        self.begin_dismissal(false, on_end)
    }

    /// Starts an interactive dismissal when the current page allows it.
    pub fn begin_dismiss_gesture(&mut self, at: Instant, y: f64) -> bool {
        if self.state != PresentationState::Presented || self.animator.is_active() {
            return false;
        }
        let allowed = self
            .paging
            .current_provider()
            .is_some_and(|provider| provider.is_dismissable_by_swiping());
        if !allowed {
            debug!("Dismiss gesture refused while zoomed in");
            return false;
        }
        if self.begin_dismissal(true, None).is_err() {
            return false;
        }
        self.gesture = Some(DismissGesture::begin(at, y, self.container.height()));
        true
    }

    /// Feeds a gesture move. Returns the transition progress.
    pub fn update_dismiss_gesture(&mut self, at: Instant, y: f64) -> Option<f64> {
        let percent = self.gesture.as_mut()?.update(at, y);
        self.animator.update(percent).ok()?;
        Some(percent)
    }

    /// Releases the gesture. Returns whether the dismissal will complete.
    pub fn end_dismiss_gesture(&mut self) -> Option<bool> {
        let gesture = self.gesture.take()?;
        self.animator.release(gesture.velocity()).ok()
    }

    /// Ends any running transition at once, back where it started.
    pub fn force_cancel_transition(&mut self) -> Option<TransitionEnded> {
        self.gesture = None;
        let ended = self.animator.force_cancel()?;
        self.on_transition_ended(ended);
        Some(ended)
    }

    /// Shows or hides the navigation bar and caption.
    pub fn set_secondary_views_visible(&mut self, visible: bool, animated: bool) {
        self.secondary
            .set_visible(visible, animated && self.settings.animations_enabled);
    }

    /// Flips the navigation bar and caption.
    pub fn toggle_secondary_views(&mut self) {
        let visible = !self.secondary.is_visible();
        self.set_secondary_views_visible(visible, true);
    }

    /// Advances animations. Returns the end of a transition that finished
    /// during this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<TransitionEnded> {
        self.secondary.tick(dt);
        let ended = self.animator.tick(dt)?;
        self.on_transition_ended(ended);
        Some(ended)
    }

    /// Whether a caption link should be followed. Follows by default.
    pub fn interact_with_url(&self, url: &str) -> bool {
        let (Some(item), Some(delegate)) = (self.paging.current_item(), self.paging.delegate())
        else {
            return true;
        };
        delegate.should_interact_with_url(&item, url).unwrap_or(true)
    }

    /// Navigation bar title.
    #[must_use]
    pub fn navigation_title(&self) -> Option<String> {
        if !self.settings.displays_navigation_item_count {
            return None;
        }
        navigation_title(self.paging.current_index(), self.paging.number_of_items())
    }

    /// Caption lines of the current item.
    #[must_use]
    pub fn caption(&self) -> (Option<AttributedText>, Option<AttributedText>) {
        self.paging.current_item().map_or((None, None), |item| {
            (item.attributed_title(), item.attributed_subtitle())
        })
    }

    /// What to draw now.
    #[must_use]
    pub fn layout(&self) -> GalleryLayout {
        let footer_hidden = self
            .paging
            .current_provider()
            .is_some_and(|provider| provider.content_view().prefers_footer_hidden());
        let transition = self.animator.layout().unwrap_or_else(|| {
            let presented = self.state == PresentationState::Presented;
            let alpha = if presented { 1.0 } else { 0.0 };
            TransitionLayout {
                frame: self.transition_context(None).presented_frame(),
                content_alpha: alpha,
                background_alpha: alpha,
            }
        });
        GalleryLayout {
            content_frame: transition.frame,
            content_alpha: transition.content_alpha,
            background_alpha: transition.background_alpha,
            navigation_alpha: self.secondary.navigation_alpha(),
            footer_alpha: self.secondary.footer_alpha(footer_hidden),
        }
    }

    fn begin_dismissal(
        &mut self,
        interactive: bool,
        on_end: Option<AnimationEndCallback>,
    ) -> Result<(), TransitionError> {
        let item = self.paging.current_item();
        let source_view = self.source_view(item.as_ref());
        let context = self.transition_context(source_view);
        self.animator
            .begin(TransitionKind::Dismissal, interactive, context, on_end)?;
        self.secondary_before_gesture = self.secondary.is_visible();
        self.set_secondary_views_visible(false, true);
        self.state = PresentationState::Dismissing;
        Ok(())
    }

    fn on_transition_ended(&mut self, ended: TransitionEnded) {
        self.state = match (ended.kind, ended.completed) {
            (TransitionKind::Presentation, true) => {
                if self.settings.should_automatically_display_secondary_views {
                    self.set_secondary_views_visible(true, true);
                }
                PresentationState::Presented
            }
            (TransitionKind::Presentation, false) => {
                self.paging.set_on_screen(false);
                PresentationState::Hidden
            }
            (TransitionKind::Dismissal, true) => {
                self.paging.set_on_screen(false);
                PresentationState::Dismissed
            }
            (TransitionKind::Dismissal, false) => {
                if self.secondary_before_gesture {
                    self.set_secondary_views_visible(true, true);
                }
                PresentationState::Presented
            }
        };
        info!(state = ?self.state, "Gallery transition finished");
    }

    fn source_view(&self, item: Option<&ItemRef>) -> Option<rc::Weak<dyn SourceView>> {
        self.paging
            .delegate()
            .and_then(|delegate| {
                delegate
                    .presentation_animation_source_view(item)
                    .implemented()
            })
            .flatten()
    }

    fn transition_context(
        &self,
        source_view: Option<rc::Weak<dyn SourceView>>,
    ) -> TransitionContext {
        let content_size = self
            .paging
            .current_provider()
            .and_then(|provider| provider.content_view().intrinsic_size())
            .or_else(|| {
                self.paging
                    .current_item()
                    .map(|item| item.content_size())
                    .filter(|size| !size.is_empty())
            })
            .unwrap_or(Size::ZERO);
        TransitionContext {
            container: self.container,
            content_size,
            source_view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentType, MediaItem};
    use crate::domain::ports::ContentProvider;
    use crate::domain::ports::mocks::{
        DelegateEvent, RecordingDelegate, RecordingLoader, StaticProvider, VecDataSource,
    };
    use std::rc::Rc;

    struct Row(Rect);

    impl SourceView for Row {
        fn frame(&self) -> Rect {
            self.0
        }
    }

    struct Harness {
        _source: Rc<VecDataSource>,
        delegate: Rc<RecordingDelegate>,
        gallery: Gallery,
        _row: Rc<dyn SourceView>,
    }

    fn harness_with(source: VecDataSource, mut delegate: RecordingDelegate) -> Harness {
        let row: Rc<dyn SourceView> = Rc::new(Row(Rect::new(0.0, 0.0, 40.0, 10.0)));
        delegate.source_view = Some(Rc::downgrade(&row));
        let source = Rc::new(source);
        let delegate = Rc::new(delegate);
        let loader: Arc<dyn ContentLoaderPort> = Arc::new(RecordingLoader::default());

        let mut gallery = Gallery::new(loader, GallerySettings::default());
        let shared_source: Rc<dyn GalleryDataSource> = source.clone();
        let weak_source = Rc::downgrade(&shared_source);
        let shared_delegate: Rc<dyn GalleryDelegate> = delegate.clone();
        let weak_delegate = Rc::downgrade(&shared_delegate);
        gallery.set_data_source(weak_source);
        gallery.set_delegate(weak_delegate);
        gallery.set_container(Rect::new(0.0, 0.0, 400.0, 800.0));
        gallery.reload_data();

        Harness {
            _source: source,
            delegate,
            gallery,
            _row: row,
        }
    }

    fn items(count: usize) -> Vec<ItemRef> {
        (0..count)
            .map(|i| MediaItem::new(format!("https://example.com/{i}.png"), ContentType::Image).into_ref())
            .collect()
    }

    fn harness(delegate: RecordingDelegate) -> Harness {
        harness_with(VecDataSource::new(items(3)), delegate)
    }

    fn settle(gallery: &mut Gallery) {
        for _ in 0..100 {
            if gallery.tick(Duration::from_millis(16)).is_some() {
                break;
            }
        }
        for _ in 0..20 {
            gallery.tick(Duration::from_millis(16));
        }
    }

    fn presented(delegate: RecordingDelegate) -> Harness {
        let mut h = harness(delegate);
        h.gallery.present(None).unwrap();
        settle(&mut h.gallery);
        assert_eq!(h.gallery.state(), PresentationState::Presented);
        h.delegate.clear();
        h
    }

    #[test]
    fn test_presentation_shows_secondary_views_when_done() {
        let mut h = harness(RecordingDelegate::default());
        h.gallery.present(None).unwrap();

        assert_eq!(h.gallery.state(), PresentationState::Presenting);
        assert!(h.gallery.layout().navigation_alpha.abs() < f64::EPSILON);
        assert!(matches!(
            h.delegate.events.borrow().first(),
            Some(DelegateEvent::SourceViewQuery(false))
        ));

        settle(&mut h.gallery);

        assert_eq!(h.gallery.state(), PresentationState::Presented);
        assert!(h.gallery.secondary_views().is_visible());
        assert!((h.gallery.layout().navigation_alpha - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_present_while_transitioning_is_rejected() {
        let mut h = harness(RecordingDelegate::default());
        h.gallery.present(None).unwrap();
        assert_eq!(h.gallery.present(None), Err(TransitionError::AlreadyActive));
    }

    #[test]
    fn test_dismiss_without_delegate_hooks_dismisses_itself() {
        let mut h = presented(RecordingDelegate::default());

        assert_eq!(h.gallery.dismiss(DismissSender::CloseButton), DismissOutcome::Animated);
        assert_eq!(h.gallery.state(), PresentationState::Dismissing);

        settle(&mut h.gallery);
        assert_eq!(h.gallery.state(), PresentationState::Dismissed);
        assert!(!h.gallery.paging().current_provider().unwrap().is_visible());
    }

    #[test]
    fn test_dismiss_prefers_delegate() {
        let mut h = presented(RecordingDelegate {
            handles_dismissal: true,
            ..RecordingDelegate::default()
        });

        assert_eq!(h.gallery.dismiss(DismissSender::Keyboard), DismissOutcome::Delegate);
        assert_eq!(h.gallery.state(), PresentationState::Presented);
        assert!(matches!(
            h.delegate.events.borrow().last(),
            Some(DelegateEvent::DismissedAnimated(true))
        ));
    }

    #[test]
    fn test_dismiss_custom_content_goes_to_custom_hook() {
        let source = VecDataSource::new(items(2)).with_providers(|item| {
            Some(Box::new(StaticProvider::for_item(item)) as Box<dyn ContentProvider>)
        });
        let delegate = RecordingDelegate {
            handles_custom_dismissal: true,
            handles_dismissal: true,
            ..RecordingDelegate::default()
        };
        let mut h = harness_with(source, delegate);
        h.gallery.present(None).unwrap();
        settle(&mut h.gallery);

        assert_eq!(
            h.gallery.dismiss(DismissSender::Programmatic),
            DismissOutcome::CustomContent
        );
    }

    #[test]
    fn test_cancelled_gesture_restores_presented_layout() {
        let mut h = presented(RecordingDelegate::default());
        let resting = h.gallery.layout();
        let start = Instant::now();

        assert!(h.gallery.begin_dismiss_gesture(start, 100.0));
        let percent = h
            .gallery
            .update_dismiss_gesture(start + Duration::from_millis(500), 180.0)
            .unwrap();
        assert!((percent - 0.2).abs() < 1e-9);
        assert_eq!(h.gallery.end_dismiss_gesture(), Some(false));

        settle(&mut h.gallery);

        assert_eq!(h.gallery.state(), PresentationState::Presented);
        assert!(h.gallery.layout().content_frame.approx_eq(&resting.content_frame));
        assert!((h.gallery.layout().navigation_alpha - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completed_gesture_dismisses() {
        let mut h = presented(RecordingDelegate::default());
        let start = Instant::now();

        assert!(h.gallery.begin_dismiss_gesture(start, 0.0));
        h.gallery
            .update_dismiss_gesture(start + Duration::from_millis(200), 300.0);
        assert_eq!(h.gallery.end_dismiss_gesture(), Some(true));
        settle(&mut h.gallery);

        assert_eq!(h.gallery.state(), PresentationState::Dismissed);
    }

    #[test]
    fn test_gesture_refused_while_zoomed_in() {
        let mut h = presented(RecordingDelegate::default());
        h.gallery.set_zoom_scale(2.0);

        assert!(!h.gallery.begin_dismiss_gesture(Instant::now(), 0.0));
        assert_eq!(h.gallery.state(), PresentationState::Presented);
    }

    #[test]
    fn test_url_interaction_defaults_to_follow() {
        let h = presented(RecordingDelegate::default());
        assert!(h.gallery.interact_with_url("https://example.com"));

        let h = presented(RecordingDelegate {
            url_answer: Some(false),
            ..RecordingDelegate::default()
        });
        assert!(!h.gallery.interact_with_url("https://example.com"));
    }

    #[test]
    fn test_navigation_title_shows_position() {
        let mut h = presented(RecordingDelegate::default());
        assert_eq!(h.gallery.navigation_title(), None);

        h.gallery.settings.displays_navigation_item_count = true;
        h.gallery.page_by(1);
        assert_eq!(h.gallery.navigation_title().as_deref(), Some("2 of 3"));
    }

    #[test]
    fn test_force_cancel_of_presentation_hides_gallery() {
        let mut h = harness(RecordingDelegate::default());
        h.gallery.present(None).unwrap();

        let ended = h.gallery.force_cancel_transition().unwrap();

        assert!(!ended.completed);
        assert_eq!(h.gallery.state(), PresentationState::Hidden);
        assert!(h.gallery.layout().content_alpha.abs() < f64::EPSILON);
    }
}
