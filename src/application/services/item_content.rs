//! The default content provider: one item, its content view and its load.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::content_type_resolver;
use crate::domain::entities::{
    ContentData, ContentType, ContentView, DownloadHandle, ItemRef, MovieClip, MovieSource,
    WeakItemRef,
};
use crate::domain::errors::LoadError;
use crate::domain::ports::{ContentLoaderPort, ContentProvider, DownloadResult};

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a controller in routed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(u64);

impl ControllerId {
    fn next() -> Self {
        Self(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Loading state of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentState {
    /// No item, or nothing started yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Content is shown.
    Ready,
    /// The last load failed.
    Failed(LoadError),
}

/// Loader callbacks re-entering the foreground, tagged with their load.
#[derive(Debug)]
#[allow(missing_docs)]
pub enum ContentEvent {
    /// Transfer progress.
    Progress {
        controller: ControllerId,
        generation: u64,
        written: u64,
        expected: Option<u64>,
    },
    /// The load finished; content was already written back to the item.
    Finished {
        controller: ControllerId,
        generation: u64,
        result: Result<ContentData, LoadError>,
    },
}

impl ContentEvent {
    /// Controller the event belongs to.
    #[must_use]
    pub const fn controller(&self) -> ControllerId {
        match self {
            Self::Progress { controller, .. } | Self::Finished { controller, .. } => *controller,
        }
    }
}

/// Called with the item (if still alive) and the error of a failed load.
pub type FailureCallback = Box<dyn FnMut(Option<ItemRef>, &LoadError)>;

/// Owns one item's content view and drives its load.
///
/// State machine: `Idle → Loading → {Ready, Failed}`; assigning an item or
/// retrying starts over. Loading does not depend on visibility.
pub struct ItemContentController {
    id: ControllerId,
    item: Option<WeakItemRef>,
    visible: bool,
    state: ContentState,
    placeholder: Option<Arc<image::DynamicImage>>,
    view: ContentView,
    loader: Weak<dyn ContentLoaderPort>,
    events: mpsc::UnboundedSender<ContentEvent>,
    download: Option<DownloadHandle>,
    generation: u64,
    on_fetch_failure: Option<FailureCallback>,
}

impl ItemContentController {
    /// Creates an idle controller. Loader callbacks arrive on `events`.
    #[must_use]
    pub fn new(
        loader: Weak<dyn ContentLoaderPort>,
        events: mpsc::UnboundedSender<ContentEvent>,
    ) -> Self {
        Self {
            id: ControllerId::next(),
            item: None,
            visible: false,
            state: ContentState::Idle,
            placeholder: None,
            view: ContentView::new(),
            loader,
            events,
            download: None,
            generation: 0,
            on_fetch_failure: None,
        }
    }

    /// Identifier used to route loader events.
    #[must_use]
    pub const fn id(&self) -> ControllerId {
        self.id
    }

    /// Load state.
    #[must_use]
    pub const fn state(&self) -> &ContentState {
        &self.state
    }

    /// Whether a download is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, ContentState::Loading)
    }

    /// Error of the last failed load.
    #[must_use]
    pub const fn last_error(&self) -> Option<&LoadError> {
        match &self.state {
            ContentState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Placeholder of the current item.
    #[must_use]
    pub const fn placeholder(&self) -> Option<&Arc<image::DynamicImage>> {
        self.placeholder.as_ref()
    }

    /// The in-flight download, if any.
    #[must_use]
    pub const fn download(&self) -> Option<&DownloadHandle> {
        self.download.as_ref()
    }

    /// Sets the callback run on a reportable failure.
    pub fn set_on_fetch_failure(&mut self, callback: FailureCallback) {
        self.on_fetch_failure = Some(callback);
    }

    /// Starts a fresh load of the current item.
    pub fn retry(&mut self) {
        if let Some(item) = self.item() {
            debug!(controller = self.id.0, "Retrying item load");
            self.assign(Some(item));
        }
    }

    /// Applies a routed loader event. Returns false for stale events.
    pub fn handle_event(&mut self, event: ContentEvent) -> bool {
        match event {
            ContentEvent::Progress {
                generation,
                written,
                expected,
                ..
            } => {
                if !self.accepts(generation) {
                    return false;
                }
                self.view.set_progress(written, expected);
                true
            }
            ContentEvent::Finished {
                generation, result, ..
            } => {
                if !self.accepts(generation) {
                    return false;
                }
                self.download = None;
                match result {
                    Ok(data) => {
                        debug!(controller = self.id.0, kind = %data.content_type(), "Item content ready");
                        self.view.show_content(data, self.visible);
                        self.state = ContentState::Ready;
                    }
                    Err(error) if error.is_cancellation() => {
                        trace!(controller = self.id.0, "Load cancelled");
                        self.state = ContentState::Idle;
                    }
                    Err(error) => self.fail(error),
                }
                true
            }
        }
    }

    fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.is_loading()
    }

    fn cancel_download(&mut self) {
        if let Some(handle) = self.download.take()
            && handle.cancel()
        {
            trace!(controller = self.id.0, task = %handle.id(), "Cancelled in-flight download");
        }
    }

    fn fail(&mut self, error: LoadError) {
        warn!(controller = self.id.0, error = %error, "Item content failed to load");
        self.view.show_failure();
        self.state = ContentState::Failed(error.clone());
        let item = self.item();
        if let Some(callback) = self.on_fetch_failure.as_mut() {
            callback(item, &error);
        }
    }

    fn assign(&mut self, item: Option<ItemRef>) {
        self.cancel_download();
        self.generation += 1;
        self.item = item.as_ref().map(Arc::downgrade);

        let Some(item) = item else {
            self.placeholder = None;
            self.view.clear();
            self.state = ContentState::Idle;
            return;
        };

        self.placeholder = item.placeholder_image();

        if let Some(data) = item.content_data() {
            trace!(controller = self.id.0, "Using resident content");
            self.view.show_content(data, self.visible);
            self.state = ContentState::Ready;
            return;
        }

        let Some(url) = item.content_url() else {
            self.view.show_loading(self.placeholder.clone());
            self.fail(LoadError::network("item has no content URL"));
            return;
        };

        let declared = item.content_type();
        if declared.is_movie() {
            trace!(controller = self.id.0, url = %url, "Streaming declared movie");
            let clip = MovieClip {
                source: MovieSource::Remote(url),
                repeating: declared == ContentType::RepeatingMovie,
            };
            self.view
                .show_content(ContentData::Movie(Arc::new(clip)), self.visible);
            self.state = ContentState::Ready;
            return;
        }

        self.view.show_loading(self.placeholder.clone());
        self.state = ContentState::Loading;
        self.start_download(&item, &url);
    }

    fn start_download(&mut self, item: &ItemRef, url: &str) {
        let Some(loader) = self.loader.upgrade() else {
            self.fail(LoadError::io("content loader is no longer available"));
            return;
        };

        let controller = self.id;
        let generation = self.generation;
        let declared = item.content_type();

        let progress_events = self.events.clone();
        let on_progress = Box::new(move |written, expected| {
            let _ = progress_events.send(ContentEvent::Progress {
                controller,
                generation,
                written,
                expected,
            });
        });

        let weak_item = Arc::downgrade(item);
        let finish_events = self.events.clone();
        let on_complete = Box::new(move |result: DownloadResult| {
            let result = result
                .and_then(|content| content_type_resolver::materialize(declared, content))
                .map(|resolved| {
                    if let Some(item) = weak_item.upgrade() {
                        if declared.is_unknown() {
                            item.set_content_type(resolved.content_type);
                        }
                        item.set_content_data(resolved.data.clone());
                    }
                    resolved.data
                });
            let _ = finish_events.send(ContentEvent::Finished {
                controller,
                generation,
                result,
            });
        });

        debug!(controller = self.id.0, url = %url, declared = %declared, "Loading item content");
        self.download = Some(loader.download(url, on_progress, on_complete));
    }
}

impl ContentProvider for ItemContentController {
    fn item(&self) -> Option<ItemRef> {
        self.item.as_ref().and_then(Weak::upgrade)
    }

    fn set_item(&mut self, item: Option<ItemRef>) {
        self.assign(item);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.view.update_playback(visible);
    }

    fn content_view(&self) -> &ContentView {
        &self.view
    }

    fn content_view_mut(&mut self) -> &mut ContentView {
        &mut self.view
    }

    fn is_custom(&self) -> bool {
        false
    }
}

impl Drop for ItemContentController {
    fn drop(&mut self) {
        self.cancel_download();
    }
}

impl std::fmt::Debug for ItemContentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemContentController")
            .field("id", &self.id)
            .field("visible", &self.visible)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
