//! Mock mailer for testing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::EmailError;
use crate::message::{build_message, parse_mailbox, AlertEmail};
use crate::traits::AlertMailer;

const MOCK_SENDER: &str = "alerts@example.com";

/// Failure a [`MockMailer`] should report instead of sending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Auth,
    Delivery,
}

/// Mailer that composes messages but keeps them in memory
#[derive(Debug, Clone)]
pub struct MockMailer {
    /// Counter for tracking calls
    pub send_count: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<AlertEmail>>>,
    failure: Option<MockFailure>,
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            send_count: Arc::new(AtomicUsize::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn send_call_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Alerts that were accepted, in send order
    pub fn sent(&self) -> Vec<AlertEmail> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AlertMailer for MockMailer {
    async fn send_alert(&self, email: &AlertEmail) -> Result<(), EmailError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        // Compose like the real mailer so invalid alerts fail the same way
        build_message(&parse_mailbox(MOCK_SENDER)?, email)?;

        match self.failure {
            Some(MockFailure::Auth) => Err(EmailError::Auth(
                "535 5.7.8 Username and Password not accepted".to_string(),
            )),
            Some(MockFailure::Delivery) => {
                Err(EmailError::Delivery("Mock send failure".to_string()))
            }
            None => {
                self.sent
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(email.clone());
                Ok(())
            }
        }
    }
}
