//! motion-store: Object store access and log page generation
//!
//! Lists images in an S3-compatible bucket, renders them newest-first into a
//! static HTML page and publishes that page back to the bucket.

pub mod error;
pub mod memory;
pub mod object;
pub mod page;
pub mod s3;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use object::{is_image_key, StoredObject, IMAGE_EXTENSIONS};
pub use page::{
    format_timestamp, render_log_page, LogEntry, LogPageBuilder, SiteUrls, LOG_PAGE_CONTENT_TYPE,
    LOG_PAGE_KEY, TIMESTAMP_FORMAT,
};
pub use s3::S3Store;
pub use store::ObjectStore;
