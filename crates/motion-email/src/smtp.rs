//! SMTP submission via lettre

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParametersBuilder};
use lettre::transport::smtp::response::Code;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, error, info};

use crate::errors::EmailError;
use crate::message::{build_message, parse_mailbox, AlertEmail};
use crate::traits::AlertMailer;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Standard mail submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Connection and identity settings for the submission relay
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Authenticated sender identity; also used as the From address
    pub sender_address: String,
    pub sender_password: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender_address", &self.sender_address)
            .field("sender_password", &"<redacted>")
            .finish()
    }
}

/// Mailer that submits alerts over STARTTLS with password authentication
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, EmailError> {
        let from = parse_mailbox(&settings.sender_address)?;

        let tls = TlsParametersBuilder::new(settings.host.clone())
            .build()
            .map_err(|e| EmailError::Configuration(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender_address.clone(),
                settings.sender_password.clone(),
            ))
            // Refuse to authenticate over a connection that did not upgrade
            .tls(Tls::Required(tls))
            .build();

        debug!(
            "SMTP transport configured for {}:{} as {}",
            settings.host, settings.port, settings.sender_address
        );

        Ok(Self { transport, from })
    }

    /// Open a session and issue NOOP, without sending anything
    pub async fn verify_connection(&self) -> Result<bool, EmailError> {
        self.transport.test_connection().await.map_err(classify_error)
    }
}

/// SMTP reply codes that mean the credentials were refused or required
fn is_auth_reply(code: &str) -> bool {
    matches!(code, "530" | "534" | "535")
}

/// Raised by lettre when the server offers no mechanism it can use
const NO_AUTH_MECHANISM: &str = "No compatible authentication mechanism";

fn is_auth_failure(status: Option<Code>, message: &str) -> bool {
    status.is_some_and(|code| is_auth_reply(&code.to_string()))
        || message.contains(NO_AUTH_MECHANISM)
}

fn classify_error(err: lettre::transport::smtp::Error) -> EmailError {
    let message = err.to_string();

    if is_auth_failure(err.status(), &message) {
        EmailError::Auth(message)
    } else {
        EmailError::Delivery(message)
    }
}

#[async_trait]
impl AlertMailer for SmtpMailer {
    async fn send_alert(&self, email: &AlertEmail) -> Result<(), EmailError> {
        let message = build_message(&self.from, email)?;

        self.transport.send(message).await.map_err(|e| {
            error!("Failed to send alert to {}: {}", email.to, e);
            classify_error(e)
        })?;

        info!("Alert email sent to {}", email.to);
        Ok(())
    }
}
