//! Stored object metadata

use chrono::{DateTime, Utc};

/// Extensions (lowercase, with dot) that are listed on the log page
pub const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Metadata about one object in the bucket, as reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key (path-like, unique within the bucket)
    pub key: String,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// Size in bytes
    pub size: i64,
}

impl StoredObject {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>, size: i64) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_key(&self.key)
    }
}

/// Returns true when the key's final extension is a recognized image type.
///
/// Only the last path segment is inspected, so `photos.jpg/readme` is not an
/// image while `cam1/SNAP.JPG` is.
pub fn is_image_key(key: &str) -> bool {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    // Leading dots mark a hidden file, not an extension
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let name = &file_name[stem_start..];
    name.rfind('.')
        .map(|idx| name[idx..].to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
