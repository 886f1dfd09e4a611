mod capability;
mod content_loader_port;
mod content_provider_port;
mod data_source_port;
mod delegate_port;
mod scheduler_port;
mod source_view_port;

pub use capability::Capability;
pub use content_loader_port::{
    CompletionCallback, ContentLoaderPort, DownloadResult, ProgressCallback,
};
pub use content_provider_port::ContentProvider;
pub use data_source_port::GalleryDataSource;
pub use delegate_port::GalleryDelegate;
pub use scheduler_port::{ForegroundScheduler, Job};
pub use source_view_port::SourceView;

#[cfg(test)]
pub use content_loader_port::MockContentLoaderPort;
