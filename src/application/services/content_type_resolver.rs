//! Resolution of an item's rendering kind and decoding of its content.
//!
//! Declared kinds are trusted. `Unknown` items are resolved from the
//! response MIME type first and by probing the bytes as a still image
//! second; anything else is a decode failure.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;
use tracing::{debug, trace};

use crate::domain::entities::{
    AnimatedImage, AnimationFrame, ContentData, ContentType, DownloadedContent, MovieClip,
    MovieSource,
};
use crate::domain::errors::LoadError;

/// Frame delays below this are treated as unset.
const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);
/// Delay used for frames with an unset delay.
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// How a kind was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The item declared it.
    Declared,
    /// From the response MIME type.
    MimeType,
    /// The bytes decoded as a still image.
    Probe,
}

/// Decoded content with its resolved kind.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Kind the content renders as.
    pub content_type: ContentType,
    /// The content.
    pub data: ContentData,
    /// How the kind was decided.
    pub resolution: Resolution,
}

/// The kind a MIME type maps to, if recognised.
#[must_use]
pub fn classify_mime(mime_type: &str) -> Option<ContentType> {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    if mime_type == "image/gif" {
        Some(ContentType::AnimatedImage)
    } else if mime_type.starts_with("image/") {
        Some(ContentType::Image)
    } else if mime_type.starts_with("video/") {
        Some(ContentType::Movie)
    } else {
        None
    }
}

/// The kind an item renders as without downloading, if it declared one.
#[must_use]
pub const fn declared_kind(declared: ContentType) -> Option<ContentType> {
    if declared.is_unknown() {
        None
    } else {
        Some(declared)
    }
}

/// Turns a finished download into renderable content.
///
/// Blocks on file I/O and decoding; call it from a background context.
///
/// # Errors
///
/// Returns `LoadError::Io` when the downloaded file cannot be read and
/// `LoadError::Decode` when the bytes are not valid for the resolved kind.
pub fn materialize(
    declared: ContentType,
    content: DownloadedContent,
) -> Result<Resolved, LoadError> {
    let (kind, resolution) = match declared_kind(declared) {
        Some(kind) => (Some(kind), Resolution::Declared),
        None => (
            content
                .response
                .mime_type
                .as_deref()
                .and_then(classify_mime),
            Resolution::MimeType,
        ),
    };

    match kind {
        Some(kind) if kind.is_movie() => {
            debug!(url = %content.response.url, kind = %kind, "Keeping downloaded movie");
            let clip = MovieClip {
                source: MovieSource::Downloaded(content.location),
                repeating: kind == ContentType::RepeatingMovie,
            };
            Ok(Resolved {
                content_type: kind,
                data: ContentData::Movie(Arc::new(clip)),
                resolution,
            })
        }
        Some(ContentType::AnimatedImage) => {
            let bytes = read(&content)?;
            let animation = decode_animation(bytes)?;
            Ok(Resolved {
                content_type: ContentType::AnimatedImage,
                data: ContentData::AnimatedImage(Arc::new(animation)),
                resolution,
            })
        }
        Some(kind) => {
            let bytes = read(&content)?;
            let image = decode_still(&bytes)?;
            Ok(Resolved {
                content_type: kind,
                data: ContentData::Image(Arc::new(image)),
                resolution,
            })
        }
        None => {
            trace!(
                url = %content.response.url,
                mime = ?content.response.mime_type,
                "Probing unrecognised content as a still image"
            );
            let bytes = read(&content)?;
            let image = decode_still(&bytes)?;
            Ok(Resolved {
                content_type: ContentType::Image,
                data: ContentData::Image(Arc::new(image)),
                resolution: Resolution::Probe,
            })
        }
    }
}

fn read(content: &DownloadedContent) -> Result<Vec<u8>, LoadError> {
    std::fs::read(&content.location)
        .map_err(|e| LoadError::io(format!("Failed to read downloaded content: {e}")))
}

fn decode_still(bytes: &[u8]) -> Result<image::DynamicImage, LoadError> {
    image::load_from_memory(bytes)
        .map_err(|e| LoadError::decode(format!("Failed to decode image: {e}")))
}

fn decode_animation(bytes: Vec<u8>) -> Result<AnimatedImage, LoadError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| LoadError::decode(format!("Failed to decode animation: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| LoadError::decode(format!("Failed to decode animation frame: {e}")))?;

    let frames = frames
        .into_iter()
        .map(|frame| {
            let delay = Duration::from(frame.delay());
            AnimationFrame {
                delay: if delay < MIN_FRAME_DELAY {
                    DEFAULT_FRAME_DELAY
                } else {
                    delay
                },
                image: Arc::new(frame.into_buffer()),
            }
        })
        .collect();

    AnimatedImage::new(frames).ok_or_else(|| LoadError::decode("Animation has no frames"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::downloaded;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, ImageFormat, RgbaImage};
    use test_case::test_case;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::new_rgb8(3, 2)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn gif_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            let frames = (0..2).map(|_| {
                Frame::from_parts(
                    RgbaImage::new(4, 4),
                    0,
                    0,
                    Delay::from_numer_denom_ms(50, 1),
                )
            });
            encoder.encode_frames(frames).unwrap();
        }
        bytes
    }

    #[test_case("image/png", Some(ContentType::Image) ; "png")]
    #[test_case("IMAGE/JPEG", Some(ContentType::Image) ; "uppercase_jpeg")]
    #[test_case("image/gif", Some(ContentType::AnimatedImage) ; "gif")]
    #[test_case("video/mp4", Some(ContentType::Movie) ; "mp4")]
    #[test_case("application/octet-stream", None ; "octet_stream")]
    #[test_case("text/html", None ; "html")]
    fn test_classify_mime(mime: &str, expected: Option<ContentType>) {
        assert_eq!(classify_mime(mime), expected);
    }

    #[test]
    fn test_unknown_with_image_mime_resolves_without_probe() {
        let content = downloaded("https://example.com/a", Some("image/png"), &png_bytes());
        let resolved = materialize(ContentType::Unknown, content).unwrap();

        assert_eq!(resolved.content_type, ContentType::Image);
        assert_eq!(resolved.resolution, Resolution::MimeType);
    }

    #[test]
    fn test_unknown_without_mime_probes_bytes() {
        let content = downloaded("https://example.com/a", None, &png_bytes());
        let resolved = materialize(ContentType::Unknown, content).unwrap();

        assert_eq!(resolved.content_type, ContentType::Image);
        assert_eq!(resolved.resolution, Resolution::Probe);
    }

    #[test]
    fn test_unknown_and_undecodable_is_decode_error() {
        let content = downloaded(
            "https://example.com/a",
            Some("application/octet-stream"),
            b"not an image",
        );
        let error = materialize(ContentType::Unknown, content).unwrap_err();
        assert!(matches!(error, LoadError::Decode { .. }));
    }

    #[test]
    fn test_declared_kind_is_trusted() {
        let content = downloaded("https://example.com/a.png", Some("text/plain"), &png_bytes());
        let resolved = materialize(ContentType::Image, content).unwrap();
        assert_eq!(resolved.resolution, Resolution::Declared);
    }

    #[test]
    fn test_gif_decodes_into_frames() {
        let content = downloaded("https://example.com/a", Some("image/gif"), &gif_bytes());
        let resolved = materialize(ContentType::Unknown, content).unwrap();

        let ContentData::AnimatedImage(animation) = resolved.data else {
            panic!("expected an animation");
        };
        assert_eq!(animation.frames().len(), 2);
        assert_eq!(animation.frames()[0].delay, Duration::from_millis(50));
    }

    #[test]
    fn test_unknown_movie_keeps_downloaded_file() {
        let content = downloaded("https://example.com/a", Some("video/mp4"), b"\0\0\0\x18ftyp");
        let path = content.location.to_path_buf();
        let resolved = materialize(ContentType::Unknown, content).unwrap();

        let ContentData::Movie(clip) = &resolved.data else {
            panic!("expected a movie");
        };
        assert_eq!(clip.local_path(), Some(path.as_path()));
        assert!(path.exists());

        drop(resolved);
        assert!(!path.exists());
    }
}
