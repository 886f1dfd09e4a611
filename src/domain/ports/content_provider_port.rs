//! The contract every content provider satisfies, built-in or custom.

use crate::domain::entities::{ContentView, ItemRef};

/// Something that shows one item in a gallery page.
///
/// The gallery only uses this surface; it never inspects a custom
/// provider any further.
pub trait ContentProvider {
    /// The item shown, if it is still alive.
    fn item(&self) -> Option<ItemRef>;

    /// Assigns a new item.
    fn set_item(&mut self, item: Option<ItemRef>);

    /// Whether the page is on screen.
    fn is_visible(&self) -> bool;

    /// Set by the gallery as pages move.
    fn set_visible(&mut self, visible: bool);

    /// The content view model.
    fn content_view(&self) -> &ContentView;

    /// Mutable access for zoom input.
    fn content_view_mut(&mut self) -> &mut ContentView;

    /// Whether the dismiss gesture may start on this page.
    fn is_dismissable_by_swiping(&self) -> bool {
        self.content_view().is_zoomed_out()
    }

    /// Whether this is a caller-supplied provider.
    fn is_custom(&self) -> bool {
        true
    }
}
