//! Configuration management.
//!
//! Settings load from `config/<name>.toml` via the `config` crate, with
//! defaults that match the original deployment (output under `data/out`,
//! one `database.csv` per protocol folder). A missing file is fine; the
//! defaults stand.

use crate::error::{ZnError, ZnResult};
use config::Config;
use serde::Deserialize;

/// Top-level library settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Output archiving settings.
    pub storage: StorageSettings,
}

/// Where archived runs land.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Root directory for all archived output.
    pub root: String,
    /// Name of the cumulative per-directory database file.
    pub database_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            storage: StorageSettings {
                root: "data/out".to_string(),
                database_file: "database.csv".to_string(),
            },
        }
    }
}

impl Settings {
    /// Load settings from `config/<name>.toml`, falling back to defaults
    /// for anything absent (including the whole file).
    pub fn new(config_name: Option<&str>) -> ZnResult<Self> {
        let config_path = format!("config/{}", config_name.unwrap_or("default"));
        let s = Config::builder()
            .set_default("log_level", "info")?
            .set_default("storage.root", "data/out")?
            .set_default("storage.database_file", "database.csv")?
            .add_source(config::File::with_name(&config_path).required(false))
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        if settings.storage.database_file.is_empty() {
            return Err(ZnError::Configuration(
                "storage.database_file must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }
}
