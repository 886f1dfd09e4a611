//! Materialized item content.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::content_type::ContentType;
use super::geometry::Size;

/// One frame of an animated image.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    /// Frame pixels.
    pub image: Arc<image::RgbaImage>,
    /// How long the frame stays on screen.
    pub delay: Duration,
}

/// Decoded frames of an animated image.
#[derive(Debug, Clone)]
pub struct AnimatedImage {
    frames: Vec<AnimationFrame>,
}

impl AnimatedImage {
    /// Creates an animation. Returns `None` when there are no frames.
    #[must_use]
    pub fn new(frames: Vec<AnimationFrame>) -> Option<Self> {
        if frames.is_empty() {
            None
        } else {
            Some(Self { frames })
        }
    }

    /// All frames in display order.
    #[must_use]
    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Total loop duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.frames.iter().map(|f| f.delay).sum()
    }

    /// The frame on screen `elapsed` into the loop.
    #[must_use]
    pub fn frame_at(&self, elapsed: Duration) -> &AnimationFrame {
        let total = self.duration();
        if total.is_zero() {
            return &self.frames[0];
        }
        let mut remaining = Duration::from_nanos(
            u64::try_from(elapsed.as_nanos() % total.as_nanos()).unwrap_or(0),
        );
        for frame in &self.frames {
            if remaining < frame.delay {
                return frame;
            }
            remaining -= frame.delay;
        }
        &self.frames[self.frames.len() - 1]
    }

    /// Pixel size of the first frame.
    #[must_use]
    pub fn size(&self) -> Size {
        self.frames[0].image.dimensions().into()
    }
}

/// Where a movie plays from.
#[derive(Debug)]
pub enum MovieSource {
    /// Streamed by the renderer straight from the content URL.
    Remote(String),
    /// A downloaded file, removed when the clip is dropped.
    Downloaded(tempfile::TempPath),
    /// A file owned by the caller.
    File(PathBuf),
}

/// A playable movie.
#[derive(Debug)]
pub struct MovieClip {
    /// Playback source.
    pub source: MovieSource,
    /// Loop without controls.
    pub repeating: bool,
}

impl MovieClip {
    /// Local path of the clip, if it has one.
    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match &self.source {
            MovieSource::Remote(_) => None,
            MovieSource::Downloaded(path) => Some(&**path),
            MovieSource::File(path) => Some(path.as_path()),
        }
    }
}

/// Fully materialized content of an item.
///
/// Cheap to clone; the payloads are shared.
#[derive(Debug, Clone)]
pub enum ContentData {
    /// Decoded still image.
    Image(Arc<image::DynamicImage>),
    /// Decoded animation frames.
    AnimatedImage(Arc<AnimatedImage>),
    /// A movie clip.
    Movie(Arc<MovieClip>),
}

impl ContentData {
    /// The rendering kind this content corresponds to.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Image(_) => ContentType::Image,
            Self::AnimatedImage(_) => ContentType::AnimatedImage,
            Self::Movie(clip) if clip.repeating => ContentType::RepeatingMovie,
            Self::Movie(_) => ContentType::Movie,
        }
    }

    /// Intrinsic pixel size, unknown for movies.
    #[must_use]
    pub fn pixel_size(&self) -> Option<Size> {
        match self {
            Self::Image(image) => Some((image.width(), image.height()).into()),
            Self::AnimatedImage(animation) => Some(animation.size()),
            Self::Movie(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ms: u64) -> AnimationFrame {
        AnimationFrame {
            image: Arc::new(image::RgbaImage::new(4, 2)),
            delay: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_empty_animation_is_rejected() {
        assert!(AnimatedImage::new(Vec::new()).is_none());
    }

    #[test]
    fn test_frame_at_wraps_around() {
        let animation = AnimatedImage::new(vec![frame(100), frame(50)]).unwrap();
        assert_eq!(animation.duration(), Duration::from_millis(150));

        let first = animation.frame_at(Duration::from_millis(20));
        assert_eq!(first.delay, Duration::from_millis(100));
        let second = animation.frame_at(Duration::from_millis(120));
        assert_eq!(second.delay, Duration::from_millis(50));
        let wrapped = animation.frame_at(Duration::from_millis(160));
        assert_eq!(wrapped.delay, Duration::from_millis(100));
    }

    #[test]
    fn test_content_type_of_data() {
        let clip = MovieClip {
            source: MovieSource::Remote("https://example.com/a.mp4".to_string()),
            repeating: true,
        };
        let data = ContentData::Movie(Arc::new(clip));
        assert_eq!(data.content_type(), ContentType::RepeatingMovie);
        assert!(data.pixel_size().is_none());

        let image = ContentData::Image(Arc::new(image::DynamicImage::new_rgb8(30, 20)));
        assert_eq!(image.pixel_size(), Some(Size::new(30.0, 20.0)));
    }
}
