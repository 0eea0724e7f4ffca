//! Mailer trait definition

use async_trait::async_trait;

use crate::errors::EmailError;
use crate::message::AlertEmail;

/// Sends alert emails.
///
/// A failed send is terminal for that alert; implementations never retry.
#[async_trait]
pub trait AlertMailer: Send + Sync {
    async fn send_alert(&self, email: &AlertEmail) -> Result<(), EmailError>;
}
