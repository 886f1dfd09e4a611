mod caption_bar;
mod fade;
mod media_view;
mod navigation_bar;
mod progress_ring;
mod url_list;

pub use caption_bar::CaptionBar;
pub use fade::{faded, shows_pixels};
pub use media_view::MediaView;
pub use navigation_bar::NavigationBar;
pub use progress_ring::ProgressRing;
pub use url_list::UrlList;
