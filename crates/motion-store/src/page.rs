//! Log page builder
//!
//! Regenerates `log/index.html`: every image in the bucket, newest first,
//! one table row per image with a link and a small preview. The page is
//! rebuilt from scratch on every call and written with a single put.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::object::StoredObject;
use crate::store::ObjectStore;

/// Well-known key the page is published under
pub const LOG_PAGE_KEY: &str = "log/index.html";

/// Content type that makes browsers render the page instead of downloading it
pub const LOG_PAGE_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Timestamp format used on the page and in alert emails
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Maximum rendered width of a preview image, in pixels
const PREVIEW_MAX_WIDTH_PX: u32 = 160;

/// Derives public URLs for objects and for the published page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    region: String,
    endpoint: Option<String>,
}

impl SiteUrls {
    pub fn new(region: impl Into<String>, endpoint: Option<String>) -> Self {
        match endpoint {
            Some(endpoint) => Self::with_endpoint(region, endpoint),
            None => Self::aws(region),
        }
    }

    /// URLs on AWS: static-website endpoint for the page, virtual-hosted URLs for objects
    pub fn aws(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
        }
    }

    /// URLs on a custom S3-compatible endpoint, path-style
    pub fn with_endpoint(region: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: Some(endpoint.into().trim_end_matches('/').to_string()),
        }
    }

    pub fn page_url(&self, bucket: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint, bucket, LOG_PAGE_KEY),
            None => format!(
                "http://{}.s3-website.{}.amazonaws.com/{}",
                bucket, self.region, LOG_PAGE_KEY
            ),
        }
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        let path = encode_key(key);
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint, bucket, path),
            None => format!("https://{}.s3.amazonaws.com/{}", bucket, path),
        }
    }
}

/// One row of the log page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp_utc: String,
    pub key: String,
    pub preview_url: String,
}

impl LogEntry {
    fn from_object(object: &StoredObject, bucket: &str, urls: &SiteUrls) -> Self {
        Self {
            timestamp_utc: format_timestamp(&object.last_modified),
            key: object.key.clone(),
            preview_url: urls.object_url(bucket, &object.key),
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds and publishes the log page
#[derive(Clone)]
pub struct LogPageBuilder {
    store: Arc<dyn ObjectStore>,
    urls: SiteUrls,
}

impl LogPageBuilder {
    pub fn new(store: Arc<dyn ObjectStore>, urls: SiteUrls) -> Self {
        Self { store, urls }
    }

    /// Collect the image entries of a bucket, newest first.
    ///
    /// The sort is stable, so objects with equal timestamps keep the order
    /// the store listed them in.
    pub async fn entries(&self, bucket: &str) -> Result<Vec<LogEntry>, StoreError> {
        let objects = self.store.list_objects(bucket).await?;

        Ok(newest_images(objects)
            .iter()
            .map(|o| LogEntry::from_object(o, bucket, &self.urls))
            .collect())
    }

    /// Regenerate the page, publish it, and return its public URL
    pub async fn build(&self, bucket: &str) -> Result<String, StoreError> {
        let entries = self.entries(bucket).await?;
        let html = render_log_page(&entries);

        debug!("Rendered log page with {} entries", entries.len());

        self.store
            .put_object(bucket, LOG_PAGE_KEY, Bytes::from(html), LOG_PAGE_CONTENT_TYPE)
            .await?;

        let url = self.urls.page_url(bucket);
        info!("Published log page ({} images) at {}", entries.len(), url);
        Ok(url)
    }
}

fn newest_images(objects: Vec<StoredObject>) -> Vec<StoredObject> {
    let mut images: Vec<StoredObject> = objects
        .into_iter()
        .filter(StoredObject::is_image)
        .collect();

    images.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    images
}

/// Render the complete HTML document for a list of entries
pub fn render_log_page(entries: &[LogEntry]) -> String {
    let rows: String = entries
        .iter()
        .map(|entry| {
            let url = escape_html(&entry.preview_url);
            format!(
                r#"
        <tr>
          <td>{ts}</td>
          <td><a href="{url}">{key}</a></td>
          <td><img src="{url}" style="max-width:{width}px"></td>
        </tr>"#,
                ts = escape_html(&entry.timestamp_utc),
                url = url,
                key = escape_html(&entry.key),
                width = PREVIEW_MAX_WIDTH_PX,
            )
        })
        .collect();

    format!(
        r#"<!doctype html><html><head>
<meta charset="utf-8"><title>Motion Log</title>
<style>body{{font-family:sans-serif}}table{{border-collapse:collapse}}
td{{padding:6px;border:1px solid #ccc}}</style></head><body>
<h1>Motion Log</h1>
<table><thead><tr><th>Timestamp (UTC)</th><th>File</th><th>Preview</th></tr></thead>
<tbody>{rows}</tbody></table></body></html>"#,
        rows = rows
    )
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::TimeZone;

    const BUCKET: &str = "wireless-network-photos";

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn builder(store: &MemoryStore) -> LogPageBuilder {
        LogPageBuilder::new(Arc::new(store.clone()), SiteUrls::aws("us-west-1"))
    }

    fn published_page(store: &MemoryStore) -> String {
        let body = store.object(BUCKET, LOG_PAGE_KEY).expect("page not published");
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[test]
    fn test_site_urls_aws() {
        let urls = SiteUrls::aws("us-west-1");
        assert_eq!(
            urls.page_url(BUCKET),
            "http://wireless-network-photos.s3-website.us-west-1.amazonaws.com/log/index.html"
        );
        assert_eq!(
            urls.object_url(BUCKET, "cam1/snap 1.jpg"),
            "https://wireless-network-photos.s3.amazonaws.com/cam1/snap%201.jpg"
        );
    }

    #[test]
    fn test_site_urls_custom_endpoint() {
        let urls = SiteUrls::with_endpoint("us-east-1", "http://localhost:9000/");
        assert_eq!(
            urls.page_url("photos"),
            "http://localhost:9000/photos/log/index.html"
        );
        assert_eq!(
            urls.object_url("photos", "a.png"),
            "http://localhost:9000/photos/a.png"
        );
    }

    #[tokio::test]
    async fn test_build_orders_images_newest_first() {
        let store = MemoryStore::new();
        store.insert(BUCKET, "t2.jpg", b"2".to_vec(), ts(2));
        store.insert(BUCKET, "t1.png", b"1".to_vec(), ts(1));
        store.insert(BUCKET, "t3.GIF", b"3".to_vec(), ts(3));
        store.insert(BUCKET, "notes.txt", b"x".to_vec(), ts(4));

        let url = builder(&store).build(BUCKET).await.unwrap();
        assert_eq!(
            url,
            "http://wireless-network-photos.s3-website.us-west-1.amazonaws.com/log/index.html"
        );

        let html = published_page(&store);
        assert_eq!(html.matches("<tr>\n").count(), 3);
        assert!(!html.contains("notes.txt"));

        let p3 = html.find(">t3.GIF<").unwrap();
        let p2 = html.find(">t2.jpg<").unwrap();
        let p1 = html.find(">t1.png<").unwrap();
        assert!(p3 < p2 && p2 < p1);

        assert!(html.contains("<td>2024-01-01 03:00:00 UTC</td>"));
        assert!(html.contains(r#"style="max-width:160px""#));
        assert_eq!(
            store.content_type(BUCKET, LOG_PAGE_KEY).as_deref(),
            Some(LOG_PAGE_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn test_build_empty_bucket() {
        let store = MemoryStore::new();

        builder(&store).build(BUCKET).await.unwrap();

        let html = published_page(&store);
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.ends_with("</html>"));
        assert!(html.contains("<tbody></tbody>"));
        assert!(!html.contains("<td>"));
    }

    #[tokio::test]
    async fn test_build_excludes_previous_page() {
        let store = MemoryStore::new();
        store.insert(BUCKET, "a.jpg", b"a".to_vec(), ts(1));
        let builder = builder(&store);

        builder.build(BUCKET).await.unwrap();
        let entries = builder.entries(BUCKET).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "a.jpg");
    }

    #[tokio::test]
    async fn test_rebuild_is_byte_identical() {
        let store = MemoryStore::new();
        store.insert(BUCKET, "a.jpg", b"a".to_vec(), ts(1));
        store.insert(BUCKET, "b.jpg", b"b".to_vec(), ts(2));
        let builder = builder(&store);

        builder.build(BUCKET).await.unwrap();
        let first = published_page(&store);
        builder.build(BUCKET).await.unwrap();
        let second = published_page(&store);

        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_keep_listing_order() {
        // Listed neither by key nor by size
        let listed = vec![
            StoredObject::new("b.jpg", ts(5), 30),
            StoredObject::new("z.jpg", ts(7), 10),
            StoredObject::new("notes.txt", ts(9), 5),
            StoredObject::new("a.jpg", ts(5), 10),
            StoredObject::new("c.jpg", ts(5), 20),
            StoredObject::new("old.png", ts(1), 40),
        ];

        let keys: Vec<String> = newest_images(listed).into_iter().map(|o| o.key).collect();
        assert_eq!(keys, vec!["z.jpg", "b.jpg", "a.jpg", "c.jpg", "old.png"]);
    }

    #[tokio::test]
    async fn test_build_list_failure_writes_nothing() {
        let store = MemoryStore::new().with_list_failure();

        let result = builder(&store).build(BUCKET).await;

        assert!(matches!(result, Err(StoreError::List { .. })));
        assert_eq!(store.put_call_count(), 0);
    }

    #[tokio::test]
    async fn test_build_put_failure() {
        let store = MemoryStore::new().with_put_failure();

        let result = builder(&store).build(BUCKET).await;

        assert!(matches!(result, Err(StoreError::Put { .. })));
        assert!(store.object(BUCKET, LOG_PAGE_KEY).is_none());
    }

    #[test]
    fn test_render_escapes_keys() {
        let entries = vec![LogEntry {
            timestamp_utc: "2024-01-01 00:00:00 UTC".to_string(),
            key: "<script>.jpg".to_string(),
            preview_url: "https://b.s3.amazonaws.com/a\"b.jpg".to_string(),
        }];

        let html = render_log_page(&entries);
        assert!(html.contains("&lt;script&gt;.jpg"));
        assert!(html.contains("a&quot;b.jpg"));
        assert!(!html.contains("<script>"));
    }
}
