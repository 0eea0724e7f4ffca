//! Relay configuration
//!
//! Everything the relay needs is collected here once at startup and
//! validated before the first request is served.

use motion_email::{parse_mailbox, SmtpSettings, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use motion_store::SiteUrls;
use thiserror::Error;

pub const DEFAULT_BUCKET: &str = "wireless-network-photos";
pub const DEFAULT_REGION: &str = "us-west-1";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {field}")]
    Missing { field: &'static str },

    #[error("Invalid address for {field} '{value}': {message}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("Invalid bucket name '{0}': expected 3-63 lowercase letters, digits, '-' or '.'")]
    InvalidBucket(String),

    #[error("Invalid SMTP port: {0}")]
    InvalidPort(u16),
}

#[derive(Clone)]
pub struct RelayConfig {
    /// Where alerts are sent
    pub alert_recipient: String,
    /// Bucket to scan and publish the log page into
    pub bucket_name: String,
    /// Region of the bucket and its website endpoint
    pub region: String,
    /// Authenticated mail identity
    pub sender_address: String,
    /// Authentication secret for the sender
    pub sender_credential: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Custom S3-compatible endpoint (MinIO, LocalStack)
    pub s3_endpoint: Option<String>,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("alert_recipient", &self.alert_recipient)
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("sender_address", &self.sender_address)
            .field("sender_credential", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("s3_endpoint", &self.s3_endpoint)
            .finish()
    }
}

impl RelayConfig {
    /// Create a configuration with default bucket, region and relay
    pub fn new(
        alert_recipient: impl Into<String>,
        sender_address: impl Into<String>,
        sender_credential: impl Into<String>,
    ) -> Self {
        Self {
            alert_recipient: alert_recipient.into(),
            bucket_name: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            sender_address: sender_address.into(),
            sender_credential: sender_credential.into(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            s3_endpoint: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require("alert_recipient", &self.alert_recipient)?;
        require("sender_address", &self.sender_address)?;
        require("sender_credential", &self.sender_credential)?;
        require("bucket_name", &self.bucket_name)?;
        require("region", &self.region)?;
        require("smtp_host", &self.smtp_host)?;

        validate_address("alert_recipient", &self.alert_recipient)?;
        validate_address("sender_address", &self.sender_address)?;

        if !is_valid_bucket_name(&self.bucket_name) {
            return Err(ConfigError::InvalidBucket(self.bucket_name.clone()));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::InvalidPort(self.smtp_port));
        }

        Ok(())
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            sender_address: self.sender_address.clone(),
            sender_password: self.sender_credential.clone(),
        }
    }

    pub fn site_urls(&self) -> SiteUrls {
        SiteUrls::new(&self.region, self.s3_endpoint.clone())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing { field });
    }
    Ok(())
}

fn validate_address(field: &'static str, value: &str) -> Result<(), ConfigError> {
    parse_mailbox(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidAddress {
            field,
            value: value.to_string(),
            message: e.to_string(),
        })
}

fn is_valid_bucket_name(name: &str) -> bool {
    let edge_ok =
        |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

    (3..=63).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        && edge_ok(name.chars().next())
        && edge_ok(name.chars().last())
}
