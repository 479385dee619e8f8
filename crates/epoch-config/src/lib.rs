//! # epoch-config
//!
//! Layered configuration loading for Epoch using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EPOCH_*` prefix, `__` as separator)
//! 2. Project-level `.epoch/config.toml`
//! 3. User-level `~/.config/epoch/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EPOCH_SERVER__PORT` -> `server.port`,
//! `EPOCH_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use epoch_config::EpochConfig;
//!
//! let config = EpochConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod client;
mod database;
mod error;
mod general;
mod playback;
mod server;

pub use client::ClientConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use playback::PlaybackConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EpochConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl EpochConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".epoch/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("EPOCH_").split("__"))
    }

    /// Reject values the rest of the system cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }
        if self.playback.base_period_ms == 0 {
            return Err(ConfigError::invalid("playback.base_period_ms", "must be positive"));
        }
        if self.playback.speeds.is_empty() {
            return Err(ConfigError::invalid("playback.speeds", "must offer at least one speed"));
        }
        let valid_speed = |s: f64| s.is_finite() && s > 0.0;
        if !self.playback.speeds.iter().copied().all(valid_speed) {
            return Err(ConfigError::invalid("playback.speeds", "speeds must be positive"));
        }
        if !valid_speed(self.playback.default_speed) {
            return Err(ConfigError::invalid("playback.default_speed", "must be positive"));
        }
        if !self.playback.offers(self.playback.default_speed) {
            return Err(ConfigError::invalid(
                "playback.default_speed",
                "must be one of playback.speeds",
            ));
        }
        for (field, value) in [
            ("general.timeline_limit", self.general.timeline_limit),
            ("general.page_size", self.general.page_size),
            ("general.max_page_size", self.general.max_page_size),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::invalid("client.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("epoch").join("config.toml"))
    }
}
