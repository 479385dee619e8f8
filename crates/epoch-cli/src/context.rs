use std::sync::Arc;

use anyhow::Context;
use epoch_config::EpochConfig;
use epoch_db::service::EpochService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<EpochService>,
    pub config: EpochConfig,
}

impl AppContext {
    /// Open the local store named by `database.path`.
    pub async fn init(config: EpochConfig) -> anyhow::Result<Self> {
        let service = EpochService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open store at {}", config.database.path))?;

        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }
}
