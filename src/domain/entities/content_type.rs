//! Rendering kinds for gallery items.

use serde::{Deserialize, Serialize};

/// The content type of a gallery item.
///
/// `Unknown` makes the gallery download the full content (even a movie)
/// and resolve the kind from the response before anything can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// Kind not declared; resolved after download.
    #[default]
    Unknown,
    /// A still image.
    Image,
    /// An animated image (GIF).
    AnimatedImage,
    /// A movie played with controls.
    Movie,
    /// A movie looped without controls.
    RepeatingMovie,
}

impl ContentType {
    /// Returns true when the kind still has to be resolved.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns true for both movie kinds.
    #[must_use]
    pub const fn is_movie(self) -> bool {
        matches!(self, Self::Movie | Self::RepeatingMovie)
    }

    /// Returns true for kinds that play on their own while visible.
    #[must_use]
    pub const fn autoplays(self) -> bool {
        matches!(self, Self::AnimatedImage | Self::RepeatingMovie)
    }

    /// Guesses a kind from a URL's file extension. Used by hosts that build
    /// items from bare URLs; the gallery itself never guesses.
    #[must_use]
    pub fn from_url_extension(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let Some((_, extension)) = path.rsplit_once('.') else {
            return Self::Unknown;
        };
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "webp" => Self::Image,
            "gif" => Self::AnimatedImage,
            "mp4" | "gifv" => Self::RepeatingMovie,
            "mov" | "m4v" | "webm" => Self::Movie,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Image => write!(f, "image"),
            Self::AnimatedImage => write!(f, "animated-image"),
            Self::Movie => write!(f, "movie"),
            Self::RepeatingMovie => write!(f, "repeating-movie"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://i.example.com/a.PNG", ContentType::Image ; "png_uppercase")]
    #[test_case("https://i.example.com/a.gif?x=1", ContentType::AnimatedImage ; "gif_with_query")]
    #[test_case("https://i.example.com/a.gifv", ContentType::RepeatingMovie ; "gifv")]
    #[test_case("https://i.example.com/clip.webm", ContentType::Movie ; "webm")]
    #[test_case("https://i.example.com/album", ContentType::Unknown ; "no_extension")]
    fn test_from_url_extension(url: &str, expected: ContentType) {
        assert_eq!(ContentType::from_url_extension(url), expected);
    }

    #[test]
    fn test_autoplay_kinds() {
        assert!(ContentType::AnimatedImage.autoplays());
        assert!(ContentType::RepeatingMovie.autoplays());
        assert!(!ContentType::Movie.autoplays());
        assert!(!ContentType::Image.autoplays());
    }
}
