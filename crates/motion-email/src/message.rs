//! Alert message composition

use bytes::Bytes;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::Message;

use crate::errors::EmailError;

/// Content id the HTML body uses to reference the inline image (`cid:snap`)
pub const INLINE_IMAGE_CID: &str = "snap";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A single alert, built fresh for every upload event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    pub to: String,
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
    /// Raw bytes of the triggering image
    pub image: Bytes,
    /// Object key of the image, used to guess its type when sniffing fails
    pub image_name: Option<String>,
}

/// Parse an address, keeping the offending input in the error
pub fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| EmailError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

/// Detect the MIME type of an image.
///
/// Magic bytes win; the file name is only consulted for formats not sniffed here.
pub fn image_content_type(bytes: &[u8], name: Option<&str>) -> String {
    let sniffed = if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else {
        None
    };

    if let Some(mime) = sniffed {
        return mime.to_string();
    }

    name.and_then(|n| mime_guess::from_path(n).first())
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}

/// Build the MIME message for an alert.
///
/// Layout:
///
/// ```text
/// multipart/related
/// ├── multipart/alternative
/// │   ├── text/plain
/// │   └── text/html
/// └── image/*  (inline, Content-ID: <snap>)
/// ```
pub fn build_message(from: &Mailbox, email: &AlertEmail) -> Result<Message, EmailError> {
    if email.image.is_empty() {
        return Err(EmailError::EmptyImage);
    }

    let to = parse_mailbox(&email.to)?;

    let content_type = image_content_type(&email.image, email.image_name.as_deref());
    let content_type =
        ContentType::parse(&content_type).map_err(|e| EmailError::Build(e.to_string()))?;

    let image = Attachment::new_inline(INLINE_IMAGE_CID.to_string())
        .body(email.image.to_vec(), content_type);

    let message = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.clone())
        .multipart(
            MultiPart::related()
                .multipart(MultiPart::alternative_plain_html(
                    email.plain_body.clone(),
                    email.html_body.clone(),
                ))
                .singlepart(image),
        )?;

    Ok(message)
}
