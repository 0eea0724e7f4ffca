//! Error types for upload event handling

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use motion_email::EmailError;
use motion_store::StoreError;
use thiserror::Error;

use crate::types::{AlertResponse, MISSING_KEY_MESSAGE};

/// Why an upload event could not be turned into an alert.
///
/// Failures after the log page was rebuilt carry its URL: the page stays
/// published even though the alert as a whole failed.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("{0}")]
    Validation(String),

    #[error("{source}")]
    StoreUnavailable {
        source: StoreError,
        page_url: Option<String>,
    },

    #[error("{source}")]
    Auth {
        source: EmailError,
        page_url: Option<String>,
    },

    #[error("{source}")]
    Delivery {
        source: EmailError,
        page_url: Option<String>,
    },

    #[error("{message}")]
    Unhandled {
        message: String,
        page_url: Option<String>,
    },
}

impl AlertError {
    pub fn missing_key() -> Self {
        AlertError::Validation(MISSING_KEY_MESSAGE.to_string())
    }

    pub fn store(source: StoreError, page_url: Option<String>) -> Self {
        AlertError::StoreUnavailable { source, page_url }
    }

    pub fn email(source: EmailError, page_url: Option<String>) -> Self {
        match source {
            EmailError::Auth(_) => AlertError::Auth { source, page_url },
            EmailError::Delivery(_) => AlertError::Delivery { source, page_url },
            other => AlertError::Unhandled {
                message: other.to_string(),
                page_url,
            },
        }
    }

    /// URL of the log page, when it was published before the failure
    pub fn page_url(&self) -> Option<&str> {
        match self {
            AlertError::Validation(_) => None,
            AlertError::StoreUnavailable { page_url, .. }
            | AlertError::Auth { page_url, .. }
            | AlertError::Delivery { page_url, .. }
            | AlertError::Unhandled { page_url, .. } => page_url.as_deref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AlertError::Validation(_) => "validation",
            AlertError::StoreUnavailable { .. } => "store_unavailable",
            AlertError::Auth { .. } => "auth",
            AlertError::Delivery { .. } => "delivery",
            AlertError::Unhandled { .. } => "unhandled",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AlertError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AlertError {
    fn into_response(self) -> Response {
        let body = AlertResponse::error(self.to_string(), self.page_url().map(str::to_string));
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_bad_request() {
        let err = AlertError::missing_key();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "'object_key' missing");
        assert_eq!(err.page_url(), None);
    }

    #[test]
    fn test_email_errors_are_classified() {
        let auth = AlertError::email(EmailError::Auth("535".to_string()), None);
        assert_eq!(auth.kind(), "auth");

        let delivery = AlertError::email(
            EmailError::Delivery("connection reset".to_string()),
            Some("http://page".to_string()),
        );
        assert_eq!(delivery.kind(), "delivery");
        assert_eq!(delivery.page_url(), Some("http://page"));
        assert_eq!(delivery.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let other = AlertError::email(EmailError::EmptyImage, None);
        assert_eq!(other.kind(), "unhandled");
        assert_eq!(other.to_string(), "Alert image is empty");
    }

    #[test]
    fn test_store_error_message_is_passed_through() {
        let err = AlertError::store(StoreError::list("photos", "AccessDenied"), None);
        assert_eq!(err.kind(), "store_unavailable");
        assert_eq!(
            err.to_string(),
            "Failed to list objects in bucket 'photos': AccessDenied"
        );
    }
}
