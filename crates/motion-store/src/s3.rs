//! S3 backend for [`ObjectStore`]

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::StoreError;
use crate::object::StoredObject;
use crate::store::ObjectStore;

/// Object store backed by Amazon S3 (or any S3-compatible endpoint)
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential chain.
    ///
    /// # Arguments
    ///
    /// * `region` - AWS region the bucket lives in
    /// * `endpoint` - Optional endpoint override (MinIO, LocalStack); enables path-style addressing
    pub async fn connect(region: &str, endpoint: Option<&str>) -> Self {
        debug!("Creating S3 client for region: {}", region);

        let region_provider = RegionProviderChain::first_try(Region::new(region.to_string()));
        let mut config_builder =
            aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region_provider);

        if let Some(ep) = endpoint {
            config_builder = config_builder.endpoint_url(ep);
        }

        let config = config_builder.load().await;
        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&config);

        // Force path-style addressing for MinIO compatibility
        if endpoint.is_some() {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        Self::new(Client::from_conf(s3_config_builder.build()))
    }
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, StoreError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| StoreError::list(bucket, DisplayErrorContext(&e).to_string()))?;
            pages += 1;

            for obj in response.contents() {
                let Some(key) = obj.key() else { continue };
                objects.push(StoredObject {
                    key: key.to_string(),
                    // Objects without a timestamp sort last
                    last_modified: obj.last_modified().and_then(to_chrono).unwrap_or_default(),
                    size: obj.size().unwrap_or(0),
                });
            }

            if response.is_truncated() != Some(true) {
                break;
            }
            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(
            "LIST {} -> {} objects in {} page(s)",
            bucket,
            objects.len(),
            pages
        );
        Ok(objects)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        debug!("GET {}/{}", bucket, key);

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::get(bucket, key, DisplayErrorContext(&e).to_string()))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::get(bucket, key, e.to_string()))?;

        Ok(data.into_bytes())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        debug!("PUT {}/{} ({} bytes, {})", bucket, key, body.len(), content_type);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::put(bucket, key, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
