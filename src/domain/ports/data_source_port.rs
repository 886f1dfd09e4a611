//! Port definition for the caller's item collection.

use super::capability::Capability;
use super::content_provider_port::ContentProvider;
use crate::domain::entities::ItemRef;

/// Supplies the ordered items a gallery pages through.
///
/// Queried on the foreground context only.
pub trait GalleryDataSource {
    /// Number of items in the collection.
    fn number_of_items(&self) -> usize;

    /// The item at `index`, or `None` when out of range.
    fn item_at(&self, index: usize) -> Option<ItemRef>;

    /// Position of `item` in the collection.
    fn index_of_item(&self, item: &ItemRef) -> Option<usize>;

    /// A caller-built provider to show `item` instead of the default one.
    ///
    /// `Implemented(None)` means "use the default" for this item only.
    fn content_provider_for_item(
        &self,
        _item: &ItemRef,
    ) -> Capability<Option<Box<dyn ContentProvider>>> {
        Capability::Unimplemented
    }
}

/// Test doubles.
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::entities::same_item;
    use std::cell::{Cell, RefCell};

    type ProviderFactory = Box<dyn Fn(&ItemRef) -> Option<Box<dyn ContentProvider>>>;

    /// An in-memory collection.
    #[derive(Default)]
    pub struct VecDataSource {
        items: RefCell<Vec<ItemRef>>,
        providers: Option<ProviderFactory>,
        provider_queries: Cell<usize>,
    }

    impl VecDataSource {
        /// Source over `items`.
        pub fn new(items: Vec<ItemRef>) -> Self {
            Self {
                items: RefCell::new(items),
                ..Self::default()
            }
        }

        /// Answers the custom provider query with `factory`.
        pub fn with_providers(
            mut self,
            factory: impl Fn(&ItemRef) -> Option<Box<dyn ContentProvider>> + 'static,
        ) -> Self {
            self.providers = Some(Box::new(factory));
            self
        }

        /// Replaces the items.
        pub fn set_items(&self, items: Vec<ItemRef>) {
            *self.items.borrow_mut() = items;
        }

        /// Current items.
        pub fn items(&self) -> Vec<ItemRef> {
            self.items.borrow().clone()
        }

        /// How many times a custom provider was asked for.
        pub fn provider_queries(&self) -> usize {
            self.provider_queries.get()
        }
    }

    impl GalleryDataSource for VecDataSource {
        fn number_of_items(&self) -> usize {
            self.items.borrow().len()
        }

        fn item_at(&self, index: usize) -> Option<ItemRef> {
            self.items.borrow().get(index).cloned()
        }

        fn index_of_item(&self, item: &ItemRef) -> Option<usize> {
            self.items
                .borrow()
                .iter()
                .position(|candidate| same_item(candidate, item))
        }

        fn content_provider_for_item(
            &self,
            item: &ItemRef,
        ) -> Capability<Option<Box<dyn ContentProvider>>> {
            self.provider_queries.set(self.provider_queries.get() + 1);
            match &self.providers {
                Some(factory) => Capability::Implemented(factory(item)),
                None => Capability::Unimplemented,
            }
        }
    }
}
