//! Error types for object store access

use thiserror::Error;

/// Errors raised by an [`ObjectStore`](crate::ObjectStore) backend.
///
/// Every variant means the store could not be reached or refused the
/// operation; callers treat them all as "store unavailable".
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to list objects in bucket '{bucket}': {message}")]
    List { bucket: String, message: String },

    #[error("Failed to read '{key}' from bucket '{bucket}': {message}")]
    Get {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to write '{key}' to bucket '{bucket}': {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },
}

impl StoreError {
    pub fn list(bucket: &str, message: impl Into<String>) -> Self {
        StoreError::List {
            bucket: bucket.to_string(),
            message: message.into(),
        }
    }

    pub fn get(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        StoreError::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn put(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        StoreError::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }
}
