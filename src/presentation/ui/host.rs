//! The host's side of the gallery ports: the URL list as data source, its
//! rows as source views, and the delegate.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::application::LinkExtractor;
use crate::domain::entities::{ItemRef, MediaItem, Rect, same_item};
use crate::domain::errors::LoadError;
use crate::domain::ports::{Capability, GalleryDataSource, GalleryDelegate, SourceView};
use crate::infrastructure::ContentTypeArg;

/// Items built from command-line URLs.
pub struct UrlListSource {
    items: Vec<ItemRef>,
}

impl UrlListSource {
    /// Builds one item per URL.
    #[must_use]
    pub fn new(urls: &[String], content_type: ContentTypeArg) -> Self {
        let items = urls
            .iter()
            .map(|url| {
                MediaItem::new(url.clone(), content_type.resolve(url))
                    .with_title(LinkExtractor::attributed(&file_name(url)))
                    .with_subtitle(LinkExtractor::attributed(&format!("[source]({url})")))
                    .into_ref()
            })
            .collect();
        Self { items }
    }

    /// Items in list order.
    #[must_use]
    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }
}

impl GalleryDataSource for UrlListSource {
    fn number_of_items(&self) -> usize {
        self.items.len()
    }

    fn item_at(&self, index: usize) -> Option<ItemRef> {
        self.items.get(index).cloned()
    }

    fn index_of_item(&self, item: &ItemRef) -> Option<usize> {
        self.items.iter().position(|candidate| same_item(candidate, item))
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// A list row the gallery animates from and back to.
#[derive(Debug, Default)]
pub struct RowView {
    frame: Cell<Rect>,
}

impl RowView {
    /// Records where the row was last drawn.
    pub fn set_frame(&self, frame: Rect) {
        self.frame.set(frame);
    }
}

impl SourceView for RowView {
    fn frame(&self) -> Rect {
        self.frame.get()
    }
}

/// Keeps the list in sync with the gallery and collects load failures.
pub struct AppDelegate {
    source: Rc<UrlListSource>,
    rows: Vec<Rc<RowView>>,
    selected: Cell<usize>,
    status: RefCell<Option<String>>,
}

impl AppDelegate {
    /// Creates a delegate with one row view per item.
    #[must_use]
    pub fn new(source: Rc<UrlListSource>) -> Self {
        let rows = (0..source.number_of_items())
            .map(|_| Rc::new(RowView::default()))
            .collect();
        Self {
            source,
            rows,
            selected: Cell::new(0),
            status: RefCell::new(None),
        }
    }

    /// Selected row.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected.get()
    }

    /// Selects a row, clamped to the list.
    pub fn select(&self, index: usize) {
        if index < self.rows.len() {
            self.selected.set(index);
        }
    }

    /// Moves the selection by `delta`, clamped to the list.
    pub fn select_by(&self, delta: isize) {
        let last = self.rows.len().saturating_sub(1);
        let index = self.selected.get().saturating_add_signed(delta).min(last);
        self.selected.set(index);
    }

    /// Row views in list order.
    #[must_use]
    pub fn rows(&self) -> &[Rc<RowView>] {
        &self.rows
    }

    /// Takes the latest failure message.
    pub fn take_status(&self) -> Option<String> {
        self.status.borrow_mut().take()
    }

    /// Status line text.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.status.borrow().clone()
    }

    fn row_for(&self, index: usize) -> Option<Weak<dyn SourceView>> {
        let row = self.rows.get(index)?;
        if row.frame().size.is_empty() {
            return None;
        }
        let row: Rc<dyn SourceView> = row.clone();
        Some(Rc::downgrade(&row))
    }
}

impl GalleryDelegate for AppDelegate {
    fn failed_loading_item(&self, item: &ItemRef, error: &LoadError) {
        let url = item.content_url().unwrap_or_default();
        warn!(url = %url, error = %error, "Item failed to load");
        *self.status.borrow_mut() = Some(format!("{}: {error}", file_name(&url)));
    }

    fn presentation_animation_source_view(
        &self,
        item: Option<&ItemRef>,
    ) -> Capability<Option<Weak<dyn SourceView>>> {
        let index = item
            .and_then(|item| self.source.index_of_item(item))
            .unwrap_or_else(|| self.selected.get());
        Capability::Implemented(self.row_for(index))
    }

    fn will_scroll_to_item(&self, item: &ItemRef) {
        if let Some(index) = self.source.index_of_item(item) {
            debug!(index, "Following gallery page in list");
            self.selected.set(index);
            self.status.borrow_mut().take();
        }
    }

    fn did_scroll_from_item(&self, item: &ItemRef) {
        trace!(url = ?item.content_url(), "Left page");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ContentType;
    use test_case::test_case;

    fn source(urls: &[&str]) -> Rc<UrlListSource> {
        let urls: Vec<String> = urls.iter().map(ToString::to_string).collect();
        Rc::new(UrlListSource::new(&urls, ContentTypeArg::Auto))
    }

    #[test_case("https://example.com/pics/cat.png?size=large", "cat.png" ; "query_stripped")]
    #[test_case("https://example.com/dir/", "dir" ; "trailing_slash")]
    #[test_case("cat", "cat" ; "bare")]
    fn test_file_name(url: &str, expected: &str) {
        assert_eq!(file_name(url), expected);
    }

    #[test]
    fn test_items_carry_declared_type_and_caption() {
        let source = source(&["https://example.com/a.gif", "https://example.com/b"]);

        let first = source.item_at(0).unwrap();
        assert_eq!(first.content_type(), ContentType::AnimatedImage);
        assert_eq!(first.attributed_title().unwrap().text, "a.gif");
        let subtitle = first.attributed_subtitle().unwrap();
        assert_eq!(subtitle.text, "source");
        assert_eq!(subtitle.links[0].url, "https://example.com/a.gif");

        assert_eq!(source.item_at(1).unwrap().content_type(), ContentType::Unknown);
        assert!(source.item_at(2).is_none());
    }

    #[test]
    fn test_source_view_follows_item_row() {
        let source = source(&["https://example.com/a.png", "https://example.com/b.png"]);
        let delegate = AppDelegate::new(Rc::clone(&source));
        delegate.rows()[1].set_frame(Rect::new(0.0, 3.0, 40.0, 1.0));
        delegate.select(1);

        let presenting = delegate.presentation_animation_source_view(None);
        let frame = presenting
            .implemented()
            .flatten()
            .and_then(|weak| weak.upgrade())
            .map(|view| view.frame());
        assert_eq!(frame, Some(Rect::new(0.0, 3.0, 40.0, 1.0)));

        let first = source.item_at(0).unwrap();
        let unmeasured = delegate.presentation_animation_source_view(Some(&first));
        assert!(unmeasured.implemented().flatten().is_none());
    }

    #[test]
    fn test_scrolling_moves_selection_and_clears_status() {
        let source = source(&["https://example.com/a.png", "https://example.com/b.png"]);
        let delegate = AppDelegate::new(Rc::clone(&source));
        let second = source.item_at(1).unwrap();

        delegate.failed_loading_item(&second, &LoadError::http(404, "Not Found"));
        assert_eq!(
            delegate.status().as_deref(),
            Some("b.png: network error: HTTP 404: Not Found")
        );

        delegate.will_scroll_to_item(&second);
        assert_eq!(delegate.selected(), 1);
        assert!(delegate.take_status().is_none());
    }

    #[test]
    fn test_select_by_clamps() {
        let delegate = AppDelegate::new(source(&["a", "b", "c"]));
        delegate.select_by(-1);
        assert_eq!(delegate.selected(), 0);
        delegate.select_by(5);
        assert_eq!(delegate.selected(), 2);
    }
}
