//! motion-email: Alert email composition and delivery
//!
//! Builds a `multipart/related` alert (plain + HTML alternatives with an
//! inline image) and submits it over an authenticated STARTTLS session.

pub mod errors;
pub mod message;
pub mod mock;
pub mod smtp;
pub mod traits;

pub use errors::EmailError;
pub use message::{
    build_message, image_content_type, parse_mailbox, AlertEmail, INLINE_IMAGE_CID,
};
pub use mock::{MockFailure, MockMailer};
pub use smtp::{SmtpMailer, SmtpSettings, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
pub use traits::AlertMailer;
