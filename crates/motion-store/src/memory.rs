//! In-memory backend for [`ObjectStore`]
//!
//! Keeps buckets in ordered maps so listings come back in key order, like S3.
//! Failures can be injected per operation, and every call is counted.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::object::StoredObject;
use crate::store::ObjectStore;

#[derive(Debug, Clone)]
struct MemoryObject {
    body: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

type Buckets = HashMap<String, BTreeMap<String, MemoryObject>>;

/// In-memory object store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    buckets: Arc<RwLock<Buckets>>,

    pub list_count: Arc<AtomicUsize>,
    pub get_count: Arc<AtomicUsize>,
    pub put_count: Arc<AtomicUsize>,

    fail_list: Arc<AtomicBool>,
    fail_get: Arc<AtomicBool>,
    fail_put: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list_failure(self) -> Self {
        self.set_fail_list(true);
        self
    }

    pub fn with_get_failure(self) -> Self {
        self.set_fail_get(true);
        self
    }

    pub fn with_put_failure(self) -> Self {
        self.set_fail_put(true);
        self
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Seed an object with an explicit modification time
    pub fn insert(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        last_modified: DateTime<Utc>,
    ) {
        let object = MemoryObject {
            body: body.into(),
            content_type: "application/octet-stream".to_string(),
            last_modified,
        };
        self.write()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), object);
    }

    /// Current contents of an object, if present
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.read()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|o| o.body.clone())
    }

    /// Content type an object was stored with, if present
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.read()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|o| o.content_type.clone())
    }

    pub fn list_call_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn get_call_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn put_call_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Buckets> {
        self.buckets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Buckets> {
        self.buckets.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, StoreError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::list(bucket, "Mock list failure"));
        }

        Ok(self
            .read()
            .get(bucket)
            .map(|objects| {
                objects
                    .iter()
                    .map(|(key, o)| StoredObject::new(key, o.last_modified, o.body.len() as i64))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_get.load(Ordering::SeqCst) {
            return Err(StoreError::get(bucket, key, "Mock get failure"));
        }

        self.object(bucket, key)
            .ok_or_else(|| StoreError::get(bucket, key, "NoSuchKey: object does not exist"))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.put_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StoreError::put(bucket, key, "Mock put failure"));
        }

        let object = MemoryObject {
            body,
            content_type: content_type.to_string(),
            last_modified: Utc::now(),
        };
        self.write()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), object);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        store
            .put_object("bucket", "a.txt", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();

        let body = store.get_object("bucket", "a.txt").await.unwrap();
        assert_eq!(body, Bytes::from_static(b"hello"));
        assert_eq!(
            store.content_type("bucket", "a.txt").as_deref(),
            Some("text/plain")
        );
        assert_eq!(store.put_call_count(), 1);
        assert_eq!(store.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_lists_in_key_order() {
        let store = MemoryStore::new();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert("bucket", "b.jpg", b"bb".to_vec(), ts);
        store.insert("bucket", "a.jpg", b"a".to_vec(), ts);
        store.insert("other", "c.jpg", b"c".to_vec(), ts);

        let objects = store.list_objects("bucket").await.unwrap();
        let keys: Vec<_> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a.jpg", "b.jpg"]);
        assert_eq!(objects[1].size, 2);
    }

    #[tokio::test]
    async fn test_memory_store_unknown_bucket_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list_objects("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_missing_key() {
        let store = MemoryStore::new();
        let result = store.get_object("bucket", "nope.jpg").await;
        assert!(matches!(result, Err(StoreError::Get { .. })));
    }

    #[tokio::test]
    async fn test_memory_store_injected_failures() {
        let store = MemoryStore::new().with_list_failure().with_put_failure();

        assert!(store.list_objects("bucket").await.is_err());
        assert!(store
            .put_object("bucket", "k", Bytes::new(), "text/plain")
            .await
            .is_err());
        assert!(store.object("bucket", "k").is_none());

        store.set_fail_list(false);
        assert!(store.list_objects("bucket").await.is_ok());
        assert_eq!(store.list_call_count(), 2);
    }
}
