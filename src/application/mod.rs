//! Application layer: the gallery and the services it is built from.

/// The gallery facade.
pub mod gallery;
/// Gallery services.
pub mod services;

pub use gallery::{
    DismissOutcome, DismissSender, Gallery, GalleryLayout, GallerySettings, PresentationState,
};
pub use services::item_content::{ContentState, ItemContentController};
pub use services::link_extractor::LinkExtractor;
pub use services::paging_controller::PagingController;
pub use services::transition_animator::{
    TransitionAnimator, TransitionEnded, TransitionKind, TransitionLayout, TransitionSettings,
};
