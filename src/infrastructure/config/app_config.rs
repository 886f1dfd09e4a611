//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;
use crate::application::{GallerySettings, TransitionSettings};
use crate::infrastructure::loader::ContentLoaderConfig;

const APP_NAME: &str = "oxigallery";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by
/// command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Paging and bar settings.
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Network settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Transition timing.
    #[serde(default)]
    pub transition: TransitionConfig,

    /// Terminal host settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Paging and secondary view behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Gap between pages, in cells.
    #[serde(default = "default_item_spacing")]
    pub item_spacing: f64,

    /// Show "N of M" in the navigation bar.
    #[serde(default)]
    pub displays_navigation_item_count: bool,

    /// Show the navigation bar and caption once presented.
    #[serde(default = "default_true")]
    pub should_automatically_display_secondary_views: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            item_spacing: default_item_spacing(),
            displays_navigation_item_count: false,
            should_automatically_display_secondary_views: true,
        }
    }
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where downloads are written. Defaults to the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            temp_dir: None,
        }
    }
}

/// Presentation and dismissal timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Presentation length in milliseconds.
    #[serde(default = "default_presentation_ms")]
    pub presentation_ms: u64,

    /// Dismissal length in milliseconds.
    #[serde(default = "default_dismissal_ms")]
    pub dismissal_ms: u64,

    /// Fraction past which a released swipe completes.
    #[serde(default = "default_completion_threshold")]
    pub completion_threshold: f64,

    /// Release speed, in cells per second, that always completes.
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            presentation_ms: default_presentation_ms(),
            dismissal_ms: default_dismissal_ms(),
            completion_threshold: default_completion_threshold(),
            velocity_threshold: default_velocity_threshold(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Enable animated transitions.
    #[serde(default = "default_true")]
    pub enable_animations: bool,

    /// Enable mouse support.
    #[serde(default = "default_true")]
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enable_animations: true,
            mouse: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_item_spacing() -> f64 {
    10.0
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("{APP_NAME}/{}", crate::VERSION)
}

fn default_presentation_ms() -> u64 {
    300
}

fn default_dismissal_ms() -> u64 {
    250
}

fn default_completion_threshold() -> f64 {
    0.5
}

fn default_velocity_threshold() -> f64 {
    800.0
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(spacing) = args.item_spacing {
            self.gallery.item_spacing = spacing;
        }
        if let Some(show_count) = args.show_count {
            self.gallery.displays_navigation_item_count = show_count;
        }
        if let Some(timeout) = args.timeout {
            self.loader.timeout_secs = timeout;
        }
        if let Some(enable_animations) = args.enable_animations {
            self.ui.enable_animations = enable_animations;
        }
    }

    /// Settings for the gallery core.
    #[must_use]
    pub fn gallery_settings(&self) -> GallerySettings {
        GallerySettings {
            item_spacing: self.gallery.item_spacing.max(0.0),
            displays_navigation_item_count: self.gallery.displays_navigation_item_count,
            should_automatically_display_secondary_views: self
                .gallery
                .should_automatically_display_secondary_views,
            animations_enabled: self.ui.enable_animations,
            transition: TransitionSettings {
                presentation_duration: Duration::from_millis(self.transition.presentation_ms),
                dismissal_duration: Duration::from_millis(self.transition.dismissal_ms),
                completion_threshold: self.transition.completion_threshold.clamp(0.0, 1.0),
                velocity_threshold: self.transition.velocity_threshold.abs(),
            },
        }
    }

    /// Settings for the HTTP loader.
    #[must_use]
    pub fn loader_config(&self) -> ContentLoaderConfig {
        let defaults = ContentLoaderConfig::default();
        ContentLoaderConfig {
            timeout: Duration::from_secs(self.loader.timeout_secs),
            connect_timeout: Duration::from_secs(self.loader.connect_timeout_secs),
            user_agent: self.loader.user_agent.clone(),
            temp_dir: self.loader.temp_dir.clone().unwrap_or(defaults.temp_dir),
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("oxigallery.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            gallery: GalleryConfig::default(),
            loader: LoaderConfig::default(),
            transition: TransitionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [gallery]
            displays_navigation_item_count = true

            [loader]
            timeout_secs = 5

            [ui]
            enable_animations = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.gallery.displays_navigation_item_count);
        assert!((config.gallery.item_spacing - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.loader.timeout_secs, 5);
        assert_eq!(config.loader.connect_timeout_secs, 10);
        assert!(!config.ui.enable_animations);
        assert_eq!(config.transition.presentation_ms, 300);
    }

    #[test]
    fn test_default_gallery_settings() {
        let settings = AppConfig::default().gallery_settings();

        assert!(settings.should_automatically_display_secondary_views);
        assert!(!settings.displays_navigation_item_count);
        assert!(settings.animations_enabled);
        assert_eq!(
            settings.transition.dismissal_duration,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "oxigallery",
            "--item-spacing",
            "4",
            "--show-count",
            "true",
            "--timeout",
            "3",
            "--enable-animations",
            "false",
            "https://example.com/a.png",
        ]);

        config.merge_with_args(&args);

        assert!((config.gallery.item_spacing - 4.0).abs() < f64::EPSILON);
        assert!(config.gallery.displays_navigation_item_count);
        assert_eq!(config.loader_config().timeout, Duration::from_secs(3));
        assert!(!config.gallery_settings().animations_enabled);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut config = AppConfig::default();
        config.gallery.item_spacing = -3.0;
        config.transition.completion_threshold = 4.0;

        let settings = config.gallery_settings();

        assert!(settings.item_spacing.abs() < f64::EPSILON);
        assert!((settings.transition.completion_threshold - 1.0).abs() < f64::EPSILON);
    }
}
