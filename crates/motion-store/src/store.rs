//! Object store trait

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::object::StoredObject;

/// Key-addressed blob storage used by the relay.
///
/// Implementations must be safe to share across concurrent requests; each
/// call is a single independent round trip.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object in the bucket, following pagination to the end.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, StoreError>;

    /// Fetch the full contents of one object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;

    /// Write (or overwrite) one object in a single put
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError>;
}
