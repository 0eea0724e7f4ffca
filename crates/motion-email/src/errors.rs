//! Error types for the email service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid email address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Alert image is empty")]
    EmptyImage,

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP authentication failed: {0}")]
    Auth(String),

    #[error("SMTP delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<lettre::error::Error> for EmailError {
    fn from(err: lettre::error::Error) -> Self {
        EmailError::Build(err.to_string())
    }
}
