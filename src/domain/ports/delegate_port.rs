//! Port definition for gallery notifications and decisions.

use std::rc::Weak;

use super::capability::Capability;
use super::content_provider_port::ContentProvider;
use super::source_view_port::SourceView;
use crate::domain::entities::ItemRef;
use crate::domain::errors::LoadError;

/// Receives gallery notifications and answers its questions.
///
/// Every hook is optional. Hooks returning [`Capability`] report
/// `Unimplemented` by default so the gallery can apply its fallback.
pub trait GalleryDelegate {
    /// An item's content failed to load. Cancellations are never reported.
    fn failed_loading_item(&self, _item: &ItemRef, _error: &LoadError) {}

    /// Whether tapping a caption link should follow it.
    fn should_interact_with_url(&self, _item: &ItemRef, _url: &str) -> Capability<bool> {
        Capability::Unimplemented
    }

    /// Lets the caller dismiss a gallery whose current page is a custom
    /// provider.
    fn should_be_dismissed_with_custom_content(
        &self,
        _content: &dyn ContentProvider,
    ) -> Capability<()> {
        Capability::Unimplemented
    }

    /// Lets the caller dismiss the gallery.
    fn should_be_dismissed_animated(&self, _animated: bool) -> Capability<()> {
        Capability::Unimplemented
    }

    /// The view the gallery appears from and returns to. `item` is `None`
    /// while presenting.
    fn presentation_animation_source_view(
        &self,
        _item: Option<&ItemRef>,
    ) -> Capability<Option<Weak<dyn SourceView>>> {
        Capability::Unimplemented
    }

    /// Paging is about to make `item` current.
    fn will_scroll_to_item(&self, _item: &ItemRef) {}

    /// `item` stopped being current.
    fn did_scroll_from_item(&self, _item: &ItemRef) {}
}

/// Test doubles.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;

    /// One recorded delegate call.
    #[allow(missing_docs)]
    pub enum DelegateEvent {
        FailedLoading(ItemRef, LoadError),
        InteractWithUrl(String),
        DismissedWithCustomContent,
        DismissedAnimated(bool),
        SourceViewQuery(bool),
        WillScrollTo(ItemRef),
        DidScrollFrom(ItemRef),
    }

    /// Records calls; optional hooks are switched on per test.
    #[derive(Default)]
    pub struct RecordingDelegate {
        /// Calls in order.
        pub events: RefCell<Vec<DelegateEvent>>,
        /// Answer to the URL hook; `None` leaves it unimplemented.
        pub url_answer: Option<bool>,
        /// Implements the custom content dismissal hook.
        pub handles_custom_dismissal: bool,
        /// Implements the dismissal hook.
        pub handles_dismissal: bool,
        /// Answer to the source view hook.
        pub source_view: Option<Weak<dyn SourceView>>,
    }

    impl RecordingDelegate {
        /// Recorded load failures.
        pub fn failures(&self) -> Vec<(ItemRef, LoadError)> {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    DelegateEvent::FailedLoading(item, error) => {
                        Some((std::sync::Arc::clone(item), error.clone()))
                    }
                    _ => None,
                })
                .collect()
        }

        /// Forgets recorded calls.
        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }

        fn record(&self, event: DelegateEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    impl GalleryDelegate for RecordingDelegate {
        fn failed_loading_item(&self, item: &ItemRef, error: &LoadError) {
            self.record(DelegateEvent::FailedLoading(
                std::sync::Arc::clone(item),
                error.clone(),
            ));
        }

        fn should_interact_with_url(&self, _item: &ItemRef, url: &str) -> Capability<bool> {
            self.record(DelegateEvent::InteractWithUrl(url.to_string()));
            self.url_answer
                .map_or(Capability::Unimplemented, Capability::Implemented)
        }

        fn should_be_dismissed_with_custom_content(
            &self,
            _content: &dyn ContentProvider,
        ) -> Capability<()> {
            if !self.handles_custom_dismissal {
                return Capability::Unimplemented;
            }
            self.record(DelegateEvent::DismissedWithCustomContent);
            Capability::Implemented(())
        }

        fn should_be_dismissed_animated(&self, animated: bool) -> Capability<()> {
            if !self.handles_dismissal {
                return Capability::Unimplemented;
            }
            self.record(DelegateEvent::DismissedAnimated(animated));
            Capability::Implemented(())
        }

        fn presentation_animation_source_view(
            &self,
            item: Option<&ItemRef>,
        ) -> Capability<Option<Weak<dyn SourceView>>> {
            self.record(DelegateEvent::SourceViewQuery(item.is_some()));
            self.source_view
                .clone()
                .map_or(Capability::Unimplemented, |view| {
                    Capability::Implemented(Some(view))
                })
        }

        fn will_scroll_to_item(&self, item: &ItemRef) {
            self.record(DelegateEvent::WillScrollTo(std::sync::Arc::clone(item)));
        }

        fn did_scroll_from_item(&self, item: &ItemRef) {
            self.record(DelegateEvent::DidScrollFrom(std::sync::Arc::clone(item)));
        }
    }
}
