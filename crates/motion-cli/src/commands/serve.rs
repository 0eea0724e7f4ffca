use std::sync::Arc;

use clap::Args;
use motion_email::{SmtpMailer, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use motion_relay::{app, AlertService, AppState, RelayConfig};
use motion_store::S3Store;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::StoreArgs;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0:5000", env = "MOTION_ADDRESS")]
    pub address: String,

    /// Recipient of alert emails
    #[arg(long, env = "MOTION_ALERT_EMAIL")]
    pub alert_email: String,

    /// Authenticated sender address
    #[arg(long, env = "MOTION_SENDER_ADDRESS")]
    pub sender_address: String,

    /// Sender password (an app password for Gmail)
    #[arg(long, env = "MOTION_SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: String,

    /// SMTP submission host
    #[arg(long, default_value = DEFAULT_SMTP_HOST, env = "MOTION_SMTP_HOST")]
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT, env = "MOTION_SMTP_PORT")]
    pub smtp_port: u16,

    /// Check the SMTP connection before accepting events
    #[arg(long, env = "MOTION_VERIFY_SMTP")]
    pub verify_smtp: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl ServeCommand {
    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            alert_recipient: self.alert_email.clone(),
            bucket_name: self.store.bucket.clone(),
            region: self.store.region.clone(),
            sender_address: self.sender_address.clone(),
            sender_credential: self.sender_password.clone(),
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            s3_endpoint: self.store.s3_endpoint.clone(),
        }
    }

    pub fn execute(self) -> anyhow::Result<()> {
        let config = self.relay_config();
        config.validate()?;
        debug!("Loaded configuration: {:?}", config);

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(run(config, self.address, self.verify_smtp))
    }
}

async fn run(config: RelayConfig, address: String, verify_smtp: bool) -> anyhow::Result<()> {
    let store = S3Store::connect(&config.region, config.s3_endpoint.as_deref()).await;
    let mailer = SmtpMailer::new(&config.smtp_settings())?;

    if verify_smtp {
        match mailer.verify_connection().await {
            Ok(true) => info!("SMTP relay {}:{} reachable", config.smtp_host, config.smtp_port),
            Ok(false) => warn!("SMTP relay {} did not answer NOOP", config.smtp_host),
            Err(e) => warn!("SMTP connection check failed: {}", e),
        }
    }

    let alert_service = AlertService::new(
        Arc::new(store),
        Arc::new(mailer),
        config.site_urls(),
        config.bucket_name.clone(),
        config.alert_recipient.clone(),
    );
    let state = Arc::new(AppState {
        alert_service: Arc::new(alert_service),
    });

    let listener = TcpListener::bind(&address).await?;
    info!(
        "Motion relay listening on {} (bucket {}, alerts to {})",
        address, config.bucket_name, config.alert_recipient
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Motion relay exited");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}
