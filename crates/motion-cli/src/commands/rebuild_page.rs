use std::sync::Arc;

use clap::Args;
use motion_store::{LogPageBuilder, S3Store, SiteUrls};
use tracing::info;

use super::StoreArgs;

#[derive(Args)]
pub struct RebuildPageCommand {
    #[command(flatten)]
    pub store: StoreArgs,
}

impl RebuildPageCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        info!("Rebuilding log page for bucket {}", self.store.bucket);

        let rt = tokio::runtime::Runtime::new()?;
        let url = rt.block_on(async {
            let store =
                S3Store::connect(&self.store.region, self.store.s3_endpoint.as_deref()).await;
            let urls = SiteUrls::new(&self.store.region, self.store.s3_endpoint.clone());

            LogPageBuilder::new(Arc::new(store), urls)
                .build(&self.store.bucket)
                .await
        })?;

        println!("{}", url);
        Ok(())
    }
}
