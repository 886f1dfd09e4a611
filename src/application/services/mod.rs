pub mod content_type_resolver;
pub mod dismiss_gesture;
pub mod item_content;
/// Caption link extraction.
pub mod link_extractor;
pub mod paging_controller;
pub mod paging_window;
pub mod progress_indicator;
pub mod secondary_views;
pub mod transition_animator;
