use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::StorageAppConfig;

fn default_owner() -> String {
    "local".into()
}

/// CLI application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageAppConfig,
    /// Owner used when `--owner` is not given. Default: "local".
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("FRAGMENTS_CONFIG").unwrap_or_else(|_| "config/config".to_string());
        Self::load_from(&config_path)
    }

    fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.path", "./data/fragments")?
            .set_default("storage.max_fragment_size", 5_i64 * 1024 * 1024)?
            .set_default("owner", "local")?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("FRAGMENTS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
