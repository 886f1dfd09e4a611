//! Current index, the page window around it and scroll notifications.

use std::cell::RefCell;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::item_content::{ContentEvent, ItemContentController};
use super::paging_window::{ContentSlot, PagingWindow};
use crate::domain::entities::{ItemRef, WeakItemRef, same_item};
use crate::domain::errors::LoadError;
use crate::domain::ports::{
    Capability, ContentLoaderPort, ContentProvider, GalleryDataSource, GalleryDelegate,
};

/// Delegate reference shared with the failure callbacks of pages.
pub type DelegateSlot = Rc<RefCell<Option<rc::Weak<dyn GalleryDelegate>>>>;

fn upgrade_delegate(slot: &DelegateSlot) -> Option<Rc<dyn GalleryDelegate>> {
    slot.borrow().as_ref().and_then(rc::Weak::upgrade)
}

/// Builds page contents.
struct SlotFactory {
    loader: sync::Weak<dyn ContentLoaderPort>,
    events: mpsc::UnboundedSender<ContentEvent>,
    delegate: DelegateSlot,
}

impl SlotFactory {
    fn build(&self, source: &dyn GalleryDataSource, index: usize) -> Option<ContentSlot> {
        let item = source.item_at(index)?;
        Some(match self.custom_provider(source, &item) {
            Some(provider) => ContentSlot::Custom(provider),
            None => self.default_slot(item),
        })
    }

    fn custom_provider(
        &self,
        source: &dyn GalleryDataSource,
        item: &ItemRef,
    ) -> Option<Box<dyn ContentProvider>> {
        match source.content_provider_for_item(item) {
            Capability::Implemented(Some(mut provider)) => {
                trace!("Adopting custom content provider");
                provider.set_item(Some(Arc::clone(item)));
                Some(provider)
            }
            Capability::Implemented(None) | Capability::Unimplemented => None,
        }
    }

    fn default_slot(&self, item: ItemRef) -> ContentSlot {
        let mut controller = ItemContentController::new(self.loader.clone(), self.events.clone());
        let delegate = Rc::clone(&self.delegate);
        controller.set_on_fetch_failure(Box::new(move |item: Option<ItemRef>, error: &LoadError| {
            let Some(item) = item else {
                debug!(error = %error, "Failed item is no longer alive");
                return;
            };
            if let Some(delegate) = upgrade_delegate(&delegate) {
                delegate.failed_loading_item(&item, error);
            }
        }));
        controller.set_item(Some(item));
        ContentSlot::Default(controller)
    }
}

/// Pages through the data source with at most three materialized pages.
pub struct PagingController {
    data_source: Option<rc::Weak<dyn GalleryDataSource>>,
    delegate: DelegateSlot,
    factory: SlotFactory,
    events: mpsc::UnboundedReceiver<ContentEvent>,
    window: PagingWindow,
    count: usize,
    current: Option<usize>,
    current_item: Option<WeakItemRef>,
    spacing: f64,
    on_screen: bool,
}

impl PagingController {
    /// Creates a controller with no data source. `spacing` separates pages.
    #[must_use]
    pub fn new(loader: sync::Weak<dyn ContentLoaderPort>, spacing: f64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let delegate: DelegateSlot = Rc::new(RefCell::new(None));
        Self {
            data_source: None,
            delegate: Rc::clone(&delegate),
            factory: SlotFactory {
                loader,
                events: tx,
                delegate,
            },
            events: rx,
            window: PagingWindow::new(),
            count: 0,
            current: None,
            current_item: None,
            spacing,
            on_screen: false,
        }
    }

    /// Sets the item source. Held weakly.
    pub fn set_data_source(&mut self, source: rc::Weak<dyn GalleryDataSource>) {
        self.data_source = Some(source);
    }

    /// Sets the delegate. Held weakly.
    pub fn set_delegate(&mut self, delegate: rc::Weak<dyn GalleryDelegate>) {
        *self.delegate.borrow_mut() = Some(delegate);
    }

    /// The data source, if still alive.
    #[must_use]
    pub fn data_source(&self) -> Option<Rc<dyn GalleryDataSource>> {
        self.data_source.as_ref().and_then(rc::Weak::upgrade)
    }

    /// The delegate, if still alive.
    #[must_use]
    pub fn delegate(&self) -> Option<Rc<dyn GalleryDelegate>> {
        upgrade_delegate(&self.delegate)
    }

    /// Gap between pages.
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Sets the gap between pages.
    pub const fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
    }

    /// Item count as of the last reload.
    #[must_use]
    pub const fn number_of_items(&self) -> usize {
        self.count
    }

    /// Index of the current page.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current item, if it is still alive.
    #[must_use]
    pub fn current_item(&self) -> Option<ItemRef> {
        self.current_item.as_ref().and_then(sync::Weak::upgrade)
    }

    /// Materialized indices in ascending order.
    #[must_use]
    pub fn window_indices(&self) -> Vec<usize> {
        self.window.indices()
    }

    /// The provider of a materialized page.
    #[must_use]
    pub fn provider(&self, index: usize) -> Option<&dyn ContentProvider> {
        self.window.get(index).map(|page| page.slot.provider())
    }

    /// Provider of the current page.
    #[must_use]
    pub fn current_provider(&self) -> Option<&dyn ContentProvider> {
        self.current.and_then(|index| self.provider(index))
    }

    /// Mutable provider of the current page.
    pub fn current_provider_mut(&mut self) -> Option<&mut dyn ContentProvider> {
        let index = self.current?;
        self.window
            .get_mut(index)
            .map(|page| page.slot.provider_mut())
    }

    /// The built-in controller of the current page.
    #[must_use]
    pub fn current_controller(&self) -> Option<&ItemContentController> {
        let index = self.current?;
        self.window.get(index).and_then(|page| page.slot.controller())
    }

    /// Horizontal offset of a page.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn page_offset(&self, index: usize, page_width: f64) -> f64 {
        index as f64 * (page_width + self.spacing)
    }

    /// Whether the gallery is on screen; only the current page of an
    /// on-screen gallery is visible.
    pub fn set_on_screen(&mut self, on_screen: bool) {
        self.on_screen = on_screen;
        self.update_visibility();
    }

    /// Re-queries the data source, staying on the current item when it
    /// still exists and clamping otherwise.
    pub fn reload_data(&mut self) {
        let Some(source) = self.data_source() else {
            warn!("Reloading without a data source");
            self.count = 0;
            self.current = None;
            self.current_item = None;
            self.window.clear();
            return;
        };

        self.count = source.number_of_items();
        if self.count == 0 {
            debug!("Collection is empty");
            self.current = None;
            self.current_item = None;
            self.window.clear();
            return;
        }

        let last = self.count - 1;
        let index = self
            .current_item()
            .and_then(|item| source.index_of_item(&item))
            .filter(|index| *index <= last)
            .unwrap_or_else(|| self.current.map_or(0, |current| current.min(last)));

        self.current = Some(index);
        self.current_item = source.item_at(index).map(|item| Arc::downgrade(&item));
        info!(count = self.count, index, "Reloaded gallery data");

        self.refresh_pages(source.as_ref());
        self.recenter(source.as_ref());
        self.update_visibility();
    }

    /// Commits a settled page change to `index`.
    ///
    /// Emits `will_scroll_to_item` before the current index changes and
    /// `did_scroll_from_item` after, then shifts the window.
    pub fn commit_page(&mut self, index: usize) -> bool {
        let Some(source) = self.data_source() else {
            return false;
        };
        if index >= self.count || self.current == Some(index) {
            return false;
        }
        let Some(target) = source.item_at(index) else {
            return false;
        };
        let previous = self.current_item();

        if let Some(delegate) = self.delegate() {
            delegate.will_scroll_to_item(&target);
        }

        let from = self.current.replace(index);
        self.current_item = Some(Arc::downgrade(&target));

        if let (Some(delegate), Some(previous)) = (self.delegate(), previous) {
            delegate.did_scroll_from_item(&previous);
        }

        debug!(from = ?from, to = index, "Committed page");
        self.recenter(source.as_ref());
        self.update_visibility();
        true
    }

    /// Converts a settled horizontal scroll offset into a page commit.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn scroll_settled(&mut self, offset: f64, page_width: f64) -> bool {
        let stride = page_width + self.spacing;
        if stride <= 0.0 || self.count == 0 {
            return false;
        }
        let index = (offset / stride).round().max(0.0) as usize;
        self.commit_page(index.min(self.count - 1))
    }

    /// Jumps to `item` without scroll notifications.
    pub fn set_current_item(&mut self, item: &ItemRef) -> bool {
        let Some(index) = self
            .data_source()
            .and_then(|source| source.index_of_item(item))
        else {
            return false;
        };
        self.set_current_index(index)
    }

    /// Jumps to `index` without scroll notifications.
    pub fn set_current_index(&mut self, index: usize) -> bool {
        let Some(source) = self.data_source() else {
            return false;
        };
        if index >= self.count {
            return false;
        }
        self.current = Some(index);
        self.current_item = source.item_at(index).map(|item| Arc::downgrade(&item));
        debug!(index, "Jumped to page");
        self.recenter(source.as_ref());
        self.update_visibility();
        true
    }

    /// Starts a fresh load of the current page.
    pub fn retry_current(&mut self) -> bool {
        let Some(index) = self.current else {
            return false;
        };
        match self.window.get_mut(index).map(|page| &mut page.slot) {
            Some(ContentSlot::Default(controller)) => {
                controller.retry();
                true
            }
            _ => false,
        }
    }

    /// Routes queued loader events to their pages. Events of evicted pages
    /// are dropped. Returns the number of events applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            let id = event.controller();
            match self.window.controller_mut(id) {
                Some(controller) => {
                    if controller.handle_event(event) {
                        applied += 1;
                    }
                }
                None => trace!(controller = ?id, "Dropping event of evicted page"),
            }
        }
        applied
    }

    fn recenter(&mut self, source: &dyn GalleryDataSource) {
        let Some(center) = self.current else {
            self.window.clear();
            return;
        };
        let factory = &self.factory;
        let evicted = self
            .window
            .recenter(center, self.count, |index| factory.build(source, index));
        if !evicted.is_empty() {
            let indices: Vec<usize> = evicted.iter().map(|page| page.index).collect();
            debug!(evicted = ?indices, "Released pages");
        }
    }

    fn refresh_pages(&mut self, source: &dyn GalleryDataSource) {
        let count = self.count;
        let moved: Vec<(usize, usize)> = self
            .window
            .pages()
            .filter_map(|page| {
                let shown = page.slot.provider().item()?;
                let index = source.index_of_item(&shown).filter(|index| *index < count)?;
                source
                    .item_at(index)
                    .filter(|fresh| same_item(fresh, &shown))?;
                Some((page.index, index))
            })
            .collect();

        let dropped = self.window.reindex(|page| {
            let followed = moved
                .iter()
                .find(|(from, _)| *from == page.index)
                .map(|(_, to)| *to);
            followed.or_else(|| {
                let free = page.index < count && moved.iter().all(|(_, to)| *to != page.index);
                free.then_some(page.index)
            })
        });
        if !dropped.is_empty() {
            trace!(dropped = dropped.len(), "Released pages of removed items");
        }

        for index in self.window.indices() {
            let Some(item) = source.item_at(index) else {
                self.window.remove(index);
                continue;
            };
            let unchanged = self
                .window
                .get(index)
                .and_then(|page| page.slot.provider().item())
                .is_some_and(|shown| same_item(&shown, &item));
            if unchanged {
                continue;
            }

            trace!(index, "Page item changed");
            let custom = self.factory.custom_provider(source, &item);
            let Some(page) = self.window.get_mut(index) else {
                continue;
            };
            if let Some(provider) = custom {
                page.slot = ContentSlot::Custom(provider);
            } else if let ContentSlot::Default(controller) = &mut page.slot {
                controller.set_item(Some(item));
            } else {
                page.slot = self.factory.default_slot(item);
            }
        }
    }

    fn update_visibility(&mut self) {
        let current = self.current;
        let on_screen = self.on_screen;
        for page in self.window.pages_mut() {
            let visible = on_screen && Some(page.index) == current;
            let provider = page.slot.provider_mut();
            if provider.is_visible() != visible {
                provider.set_visible(visible);
            }
        }
    }
}
