//! Gallery items as seen by the gallery.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::content::ContentData;
use super::content_type::ContentType;
use super::geometry::Size;

/// A link span inside an [`AttributedText`], as a byte range of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLink {
    /// Byte range of the linked text.
    pub range: std::ops::Range<usize>,
    /// Target URL.
    pub url: String,
}

/// Caption text with link spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributedText {
    /// Visible text.
    pub text: String,
    /// Links, ordered by position.
    pub links: Vec<TextLink>,
}

impl AttributedText {
    /// Plain text without links.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            links: Vec::new(),
        }
    }

    /// Returns the link covering the byte `offset`, if any.
    #[must_use]
    pub fn link_at(&self, offset: usize) -> Option<&TextLink> {
        self.links.iter().find(|link| link.range.contains(&offset))
    }

    /// Returns true when the text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The capability set the gallery consumes from a caller's item.
///
/// Items are owned by the caller. `set_content_type` and `set_content_data`
/// are a side channel the gallery writes resolved results into; the content
/// data write happens from a background thread.
pub trait GalleryItem: Send + Sync {
    /// URL of the content to show.
    fn content_url(&self) -> Option<String>;

    /// Declared content type.
    fn content_type(&self) -> ContentType;

    /// Stores a resolved content type.
    fn set_content_type(&self, content_type: ContentType);

    /// Image shown while the content loads.
    fn placeholder_image(&self) -> Option<Arc<image::DynamicImage>> {
        None
    }

    /// Already available full-size content. When present no fetch happens.
    fn content_data(&self) -> Option<ContentData> {
        None
    }

    /// Stores fetched content. Returns false when the item does not accept
    /// write-back.
    fn set_content_data(&self, _data: ContentData) -> bool {
        false
    }

    /// Bold caption line.
    fn attributed_title(&self) -> Option<AttributedText> {
        None
    }

    /// Regular caption line.
    fn attributed_subtitle(&self) -> Option<AttributedText> {
        None
    }

    /// Size of the content, used for movies whose frames are not decoded.
    fn content_size(&self) -> Size {
        Size::ZERO
    }
}

/// Strong reference to a caller item.
pub type ItemRef = Arc<dyn GalleryItem>;

/// Non-owning reference to a caller item.
pub type WeakItemRef = Weak<dyn GalleryItem>;

/// Item identity is reference identity.
#[must_use]
pub fn same_item(a: &ItemRef, b: &ItemRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Compares a weak reference against a live item without upgrading.
#[must_use]
pub fn weak_is(weak: &WeakItemRef, item: &ItemRef) -> bool {
    std::ptr::addr_eq(weak.as_ptr(), Arc::as_ptr(item))
}

/// A ready-made item for hosts that do not bring their own model.
pub struct MediaItem {
    url: Option<String>,
    content_type: RwLock<ContentType>,
    content_data: RwLock<Option<ContentData>>,
    placeholder: Option<Arc<image::DynamicImage>>,
    title: Option<AttributedText>,
    subtitle: Option<AttributedText>,
    content_size: Size,
}

impl MediaItem {
    /// Creates an item for a URL with a declared content type.
    #[must_use]
    pub fn new(url: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            url: Some(url.into()),
            content_type: RwLock::new(content_type),
            content_data: RwLock::new(None),
            placeholder: None,
            title: None,
            subtitle: None,
            content_size: Size::ZERO,
        }
    }

    /// Creates an item without a URL.
    #[must_use]
    pub fn without_url(content_type: ContentType) -> Self {
        Self {
            url: None,
            ..Self::new(String::new(), content_type)
        }
    }

    /// Sets the placeholder image.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Arc<image::DynamicImage>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Pre-populates content data.
    #[must_use]
    pub fn with_content_data(self, data: ContentData) -> Self {
        *self.content_data.write() = Some(data);
        self
    }

    /// Sets the caption title.
    #[must_use]
    pub fn with_title(mut self, title: AttributedText) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the caption subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: AttributedText) -> Self {
        self.subtitle = Some(subtitle);
        self
    }

    /// Sets the declared content size.
    #[must_use]
    pub const fn with_content_size(mut self, size: Size) -> Self {
        self.content_size = size;
        self
    }

    /// Wraps the item for use with the gallery.
    #[must_use]
    pub fn into_ref(self) -> ItemRef {
        Arc::new(self)
    }
}

impl std::fmt::Debug for MediaItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaItem")
            .field("url", &self.url)
            .field("content_type", &*self.content_type.read())
            .field("has_content_data", &self.content_data.read().is_some())
            .field("has_placeholder", &self.placeholder.is_some())
            .finish_non_exhaustive()
    }
}

impl GalleryItem for MediaItem {
    fn content_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn content_type(&self) -> ContentType {
        *self.content_type.read()
    }

    fn set_content_type(&self, content_type: ContentType) {
        *self.content_type.write() = content_type;
    }

    fn placeholder_image(&self) -> Option<Arc<image::DynamicImage>> {
        self.placeholder.clone()
    }

    fn content_data(&self) -> Option<ContentData> {
        self.content_data.read().clone()
    }

    fn set_content_data(&self, data: ContentData) -> bool {
        *self.content_data.write() = Some(data);
        true
    }

    fn attributed_title(&self) -> Option<AttributedText> {
        self.title.clone()
    }

    fn attributed_subtitle(&self) -> Option<AttributedText> {
        self.subtitle.clone()
    }

    fn content_size(&self) -> Size {
        self.content_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_by_reference() {
        let a = MediaItem::new("https://example.com/a.png", ContentType::Image).into_ref();
        let b = MediaItem::new("https://example.com/a.png", ContentType::Image).into_ref();
        let a2 = Arc::clone(&a);

        assert!(same_item(&a, &a2));
        assert!(!same_item(&a, &b));
        assert!(weak_is(&Arc::downgrade(&a), &a2));
    }

    #[test]
    fn test_write_back_is_visible_to_caller() {
        let item = MediaItem::new("https://example.com/a", ContentType::Unknown).into_ref();
        assert!(item.content_data().is_none());

        let data = ContentData::Image(Arc::new(image::DynamicImage::new_rgb8(1, 1)));
        assert!(item.set_content_data(data));
        item.set_content_type(ContentType::Image);

        assert!(item.content_data().is_some());
        assert_eq!(item.content_type(), ContentType::Image);
    }

    #[test]
    fn test_link_at_offset() {
        let text = AttributedText {
            text: "see source".to_string(),
            links: vec![TextLink {
                range: 4..10,
                url: "https://example.com".to_string(),
            }],
        };
        assert!(text.link_at(2).is_none());
        assert_eq!(
            text.link_at(5).map(|l| l.url.as_str()),
            Some("https://example.com")
        );
    }
}
