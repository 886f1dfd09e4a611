//! The fixed three-slot window of materialized pages.

use tracing::trace;

use super::item_content::{ControllerId, ItemContentController};
use crate::domain::ports::ContentProvider;

/// What fills a page.
pub enum ContentSlot {
    /// The built-in controller.
    Default(ItemContentController),
    /// A provider supplied by the data source.
    Custom(Box<dyn ContentProvider>),
}

impl ContentSlot {
    /// The page's provider.
    #[must_use]
    pub fn provider(&self) -> &dyn ContentProvider {
        match self {
            Self::Default(controller) => controller,
            Self::Custom(provider) => provider.as_ref(),
        }
    }

    /// The page's provider, mutably.
    pub fn provider_mut(&mut self) -> &mut dyn ContentProvider {
        match self {
            Self::Default(controller) => controller,
            Self::Custom(provider) => provider.as_mut(),
        }
    }

    /// The built-in controller, if this slot holds one.
    #[must_use]
    pub const fn controller(&self) -> Option<&ItemContentController> {
        match self {
            Self::Default(controller) => Some(controller),
            Self::Custom(_) => None,
        }
    }

    /// The built-in controller, mutably.
    pub fn controller_mut(&mut self) -> Option<&mut ItemContentController> {
        match self {
            Self::Default(controller) => Some(controller),
            Self::Custom(_) => None,
        }
    }
}

/// A materialized page at a data source index.
pub struct Page {
    /// Data source index.
    pub index: usize,
    /// Page content.
    pub slot: ContentSlot,
}

/// Previous, current and next page.
///
/// Pages outside the window are dropped, which cancels their downloads.
#[derive(Default)]
pub struct PagingWindow {
    slots: [Option<Page>; 3],
}

impl PagingWindow {
    /// Creates an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the window to `center`, keeping pages still inside it and
    /// materializing missing ones with `make`. Returns the evicted pages.
    pub fn recenter(
        &mut self,
        center: usize,
        count: usize,
        mut make: impl FnMut(usize) -> Option<ContentSlot>,
    ) -> Vec<Page> {
        let wanted = [
            center.checked_sub(1),
            (center < count).then_some(center),
            center.checked_add(1).filter(|next| *next < count),
        ];

        let mut kept: Vec<Page> = Vec::with_capacity(3);
        let mut evicted = Vec::new();
        for page in self.slots.iter_mut().filter_map(Option::take) {
            if wanted.contains(&Some(page.index)) {
                kept.push(page);
            } else {
                trace!(index = page.index, "Evicting page");
                evicted.push(page);
            }
        }

        for (position, index) in wanted.into_iter().enumerate() {
            let Some(index) = index else {
                continue;
            };
            self.slots[position] = match kept.iter().position(|page| page.index == index) {
                Some(found) => Some(kept.swap_remove(found)),
                None => make(index).map(|slot| {
                    trace!(index, "Materializing page");
                    Page { index, slot }
                }),
            };
        }

        evicted
    }

    /// Drops every page.
    pub fn clear(&mut self) -> Vec<Page> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    /// Page at `index`, if materialized.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages().find(|page| page.index == index)
    }

    /// Mutable page at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages_mut().find(|page| page.index == index)
    }

    /// Moves pages to the indices `index_of` gives them. Pages mapped to
    /// `None`, or to an index an earlier page already took, are removed and
    /// returned.
    pub fn reindex(&mut self, mut index_of: impl FnMut(&Page) -> Option<usize>) -> Vec<Page> {
        let targets: Vec<Option<usize>> = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().and_then(|page| index_of(page)))
            .collect();

        let mut taken = Vec::with_capacity(3);
        let mut dropped = Vec::new();
        for (slot, target) in self.slots.iter_mut().zip(targets) {
            let Some(page) = slot.as_mut() else {
                continue;
            };
            match target {
                Some(index) if !taken.contains(&index) => {
                    page.index = index;
                    taken.push(index);
                }
                _ => dropped.extend(slot.take()),
            }
        }
        dropped
    }

    /// Removes the page at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Page> {
        self.slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|page| page.index == index))
            .and_then(Option::take)
    }

    /// The built-in controller with id `id`.
    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut ItemContentController> {
        self.pages_mut()
            .filter_map(|page| page.slot.controller_mut())
            .find(|controller| controller.id() == id)
    }

    /// Materialized indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.pages().map(|page| page.index).collect();
        indices.sort_unstable();
        indices
    }

    /// Number of materialized pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages().count()
    }

    /// Whether no page is materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialized pages.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.slots.iter().flatten()
    }

    /// Materialized pages, mutably.
    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.slots.iter_mut().flatten()
    }
}
