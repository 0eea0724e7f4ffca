pub mod rebuild_page;
pub mod serve;

pub use rebuild_page::RebuildPageCommand;
pub use serve::ServeCommand;

use clap::Args;
use motion_relay::config::{DEFAULT_BUCKET, DEFAULT_REGION};

/// Object store location, shared by every command
#[derive(Args)]
pub struct StoreArgs {
    /// Bucket holding the uploaded images and the log page
    #[arg(long, default_value = DEFAULT_BUCKET, env = "MOTION_BUCKET")]
    pub bucket: String,

    /// Region of the bucket and its static-website endpoint
    #[arg(long, default_value = DEFAULT_REGION, env = "MOTION_REGION")]
    pub region: String,

    /// Custom S3-compatible endpoint (MinIO, LocalStack)
    #[arg(long, env = "MOTION_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,
}
