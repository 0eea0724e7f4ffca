//! Upload event processing
//!
//! Received -> Validated -> PageBuilt -> ImageFetched -> Sent. Any step may
//! fail; the first failure ends processing and is returned as an
//! [`AlertError`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use motion_email::{AlertEmail, AlertMailer, INLINE_IMAGE_CID};
use motion_store::{format_timestamp, LogPageBuilder, ObjectStore, SiteUrls};
use tracing::{error, info, warn};

use crate::error::AlertError;
use crate::types::UploadEvent;

/// Source of the current time embedded in alerts
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Result of a fully processed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOutcome {
    pub page_url: String,
}

pub struct AlertService {
    store: Arc<dyn ObjectStore>,
    mailer: Arc<dyn AlertMailer>,
    page_builder: LogPageBuilder,
    bucket: String,
    recipient: String,
    clock: Clock,
}

impl AlertService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn AlertMailer>,
        urls: SiteUrls,
        bucket: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            page_builder: LogPageBuilder::new(store.clone(), urls),
            store,
            mailer,
            bucket: bucket.into(),
            recipient: recipient.into(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Process one upload event end to end.
    ///
    /// Validation failures are rejected before any store or mail call.
    /// Every failure is logged here; callers only need to render it.
    pub async fn handle_upload_event(
        &self,
        event: &UploadEvent,
    ) -> Result<AlertOutcome, AlertError> {
        let Some(key) = event.resolve_key() else {
            warn!("Rejected upload event without an object key");
            return Err(AlertError::missing_key());
        };

        info!("Processing {}", key);

        self.process(key).await.inspect_err(|e| {
            error!(
                "Alert for {} failed ({}): {:?}{}",
                key,
                e.kind(),
                e,
                e.page_url()
                    .map(|url| format!("; log page already published at {}", url))
                    .unwrap_or_default()
            );
        })
    }

    async fn process(&self, key: &str) -> Result<AlertOutcome, AlertError> {
        let page_url = self
            .page_builder
            .build(&self.bucket)
            .await
            .map_err(|e| AlertError::store(e, None))?;

        let image = self
            .store
            .get_object(&self.bucket, key)
            .await
            .map_err(|e| AlertError::store(e, Some(page_url.clone())))?;

        let email = self.compose(key, &page_url, image);

        self.mailer
            .send_alert(&email)
            .await
            .map_err(|e| AlertError::email(e, Some(page_url.clone())))?;

        info!("Alert e-mail sent to {}", self.recipient);

        Ok(AlertOutcome { page_url })
    }

    fn compose(&self, key: &str, page_url: &str, image: bytes::Bytes) -> AlertEmail {
        let ts = format_timestamp(&(self.clock)());

        AlertEmail {
            to: self.recipient.clone(),
            subject: format!("Motion Alert - {}", ts),
            plain_body: format!("Motion detected at {}\nView: {}", ts, page_url),
            html_body: format!(
                "<p>Motion detected at {ts}.</p>\
                 <p><a href='{url}'>View log page</a></p>\
                 <img src='cid:{cid}' style='max-width:100%'>",
                ts = ts,
                url = page_url,
                cid = INLINE_IMAGE_CID,
            ),
            image,
            image_name: Some(key.to_string()),
        }
    }
}
