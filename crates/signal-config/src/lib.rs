//! Configuration management.

mod settings;

pub use settings::{AppConfig, DataSettings, LoggingSettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `SIGNALS__ENGINE__MAX_CONCURRENCY=8`.
pub const ENV_PREFIX: &str = "SIGNALS";

/// Load configuration from an optional TOML file and the environment.
///
/// Every field has a default, so with no file and no variables this
/// returns [`AppConfig::default`]. A path that is given must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("engine.default_universe")
                .with_list_parse_key("filters.sector_exclude")
                .with_list_parse_key("filters.sectors_biotech"),
        )
        .build()?;

    config.try_deserialize()
}

/// Load and check that the engine can run with the result.
pub fn load_validated(path: Option<&Path>) -> Result<AppConfig, signal_core::SignalError> {
    let config =
        load_config(path).map_err(|e| signal_core::SignalError::Config(e.to_string()))?;
    config.engine_config().validate()?;
    Ok(config)
}
