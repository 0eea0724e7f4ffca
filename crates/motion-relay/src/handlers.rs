//! HTTP handlers for upload events

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::AlertError;
use crate::service::AlertService;
use crate::types::{AlertResponse, UploadEvent};

pub struct AppState {
    pub alert_service: Arc<AlertService>,
}

/// Configure relay routes
pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/s3-event", post(handle_s3_event))
        .route("/health", get(health))
}

/// Complete application with request tracing and panic recovery
pub fn app(state: Arc<AppState>) -> Router {
    with_middleware(configure_routes()).with_state(state)
}

fn with_middleware(router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// A panicking handler still answers with the JSON error contract
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    AlertError::Unhandled {
        message: format!("Internal error: {}", detail),
        page_url: None,
    }
    .into_response()
}

/// Receive an upload notification.
///
/// The body is parsed as JSON whatever its content type. Senders are
/// not always consistent about headers. Unreadable bodies are rejected
/// with 400 before any store or mail call, rather than surfacing as a 500.
pub async fn handle_s3_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AlertError> {
    let event = UploadEvent::from_slice(&body).inspect_err(|e| {
        warn!("Rejected malformed upload event: {}", e);
    })?;

    let outcome = state.alert_service.handle_upload_event(&event).await?;

    Ok((StatusCode::OK, Json(AlertResponse::ok(outcome.page_url))))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use motion_email::MockMailer;
    use motion_store::{MemoryStore, SiteUrls};
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        let service = AlertService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MockMailer::new()),
            SiteUrls::aws("us-west-1"),
            "wireless-network-photos",
            "ops@example.com",
        );
        Arc::new(AppState {
            alert_service: Arc::new(service),
        })
    }

    #[tokio::test]
    async fn test_panic_returns_json_error() -> Result<(), Box<dyn std::error::Error>> {
        let router = configure_routes().route(
            "/explode",
            post(|| async { panic!("image decoder exploded") as () }),
        );
        let app = with_middleware(router).with_state(state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/explode")
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await?.to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(
            json,
            serde_json::json!({
                "status": "error",
                "message": "Internal error: image decoder exploded"
            })
        );
        Ok(())
    }
}
