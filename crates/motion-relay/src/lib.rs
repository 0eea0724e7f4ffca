//! motion-relay: Upload event handling for the motion alert pipeline
//!
//! Receives an "image uploaded" event, republishes the log page, and mails the
//! operator a link to it with the new image inline.

pub mod config;
pub mod error;
pub mod handlers;
pub mod service;
pub mod types;

pub use config::{ConfigError, RelayConfig};
pub use error::AlertError;
pub use handlers::{app, configure_routes, AppState};
pub use service::{AlertOutcome, AlertService, Clock};
pub use types::{AlertResponse, UploadEvent, MISSING_KEY_MESSAGE};
