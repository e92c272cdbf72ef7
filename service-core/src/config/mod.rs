//! Settings every school-platform service shares, regardless of domain.
//!
//! Only the listen port lives here; each service reads its own settings
//! (database, keys, rate limits) on top of this in its config module.

use crate::error::AppError;
use config::{Config as Loader, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from an optional `school.toml` next to the binary, then from
    /// plain environment variables (`PORT`) — the same unprefixed
    /// convention the services use for the rest of their settings.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let loaded = Loader::builder()
            .add_source(File::with_name("school").required(false))
            .add_source(config::Environment::default())
            .build()?;

        Ok(loaded.try_deserialize()?)
    }
}
