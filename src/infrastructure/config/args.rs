use super::app_config::LogLevel;
use crate::domain::entities::ContentType;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the host declares the kind of each URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ContentTypeArg {
    /// Guess from the file extension.
    #[default]
    Auto,
    /// Let the gallery download and resolve it.
    Unknown,
    /// Still image.
    Image,
    /// Animated image such as a GIF.
    AnimatedImage,
    /// Movie played once.
    Movie,
    /// Movie played in a loop.
    RepeatingMovie,
}

impl ContentTypeArg {
    /// The declared kind for `url`.
    #[must_use]
    pub fn resolve(self, url: &str) -> ContentType {
        match self {
            Self::Auto => ContentType::from_url_extension(url),
            Self::Unknown => ContentType::Unknown,
            Self::Image => ContentType::Image,
            Self::AnimatedImage => ContentType::AnimatedImage,
            Self::Movie => ContentType::Movie,
            Self::RepeatingMovie => ContentType::RepeatingMovie,
        }
    }
}

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "oxigallery",
    version,
    about = "A terminal media gallery",
    long_about = None
)]
pub struct CliArgs {
    /// Media URLs to show.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Gap between pages.
    #[arg(long)]
    pub item_spacing: Option<f64>,

    /// Show "N of M" in the navigation bar.
    #[arg(long)]
    pub show_count: Option<bool>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable animated transitions.
    #[arg(long)]
    pub enable_animations: Option<bool>,

    /// Item selected at startup.
    #[arg(long, default_value_t = 0)]
    pub start_index: usize,

    /// Declared content type of every URL.
    #[arg(long, value_enum, default_value_t = ContentTypeArg::Auto)]
    pub content_type: ContentTypeArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_arg_resolution() {
        assert_eq!(
            ContentTypeArg::Auto.resolve("https://example.com/a.gif"),
            ContentType::AnimatedImage
        );
        assert_eq!(
            ContentTypeArg::Movie.resolve("https://example.com/a.gif"),
            ContentType::Movie
        );
        assert_eq!(
            ContentTypeArg::Unknown.resolve("https://example.com/a.png"),
            ContentType::Unknown
        );
    }

    #[test]
    fn test_parse_urls_and_flags() {
        let args = CliArgs::parse_from([
            "oxigallery",
            "--start-index",
            "1",
            "--content-type",
            "unknown",
            "https://a.example/1",
            "https://a.example/2",
        ]);

        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.start_index, 1);
        assert_eq!(args.content_type, ContentTypeArg::Unknown);
        assert!(args.config.is_none());
    }
}
