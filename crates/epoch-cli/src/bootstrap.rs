use anyhow::Context;
use epoch_config::EpochConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration, then apply flag overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<EpochConfig> {
    load_dotenv()?;

    let mut config = EpochConfig::load().context("failed to load epoch configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(anyhow::anyhow!("failed to load .env: {error}")),
    }
}

fn apply_overrides(config: &mut EpochConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
}
