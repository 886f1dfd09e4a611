//! Oxigallery - an embeddable media gallery core with a terminal host.
//!
//! The gallery pages through a caller's items three pages at a time, loads
//! and resolves their content in the background, and animates presentation
//! and dismissal from the view an item came from.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the gallery and its services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for the ports.
pub mod infrastructure;
/// Presentation layer containing the terminal host.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "oxigallery";
