mod settings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{HubSettings, LoggingSettings, Settings};

/// Prefix for environment overrides, e.g. `TOPICHUB_HUB__QUEUE_CAPACITY=8`.
pub const ENV_PREFIX: &str = "TOPICHUB";

/// Loads `config/default.*` (if present), a `.env` file (if present) and
/// `TOPICHUB_*` environment variables, merged over the defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    load_config_from(Path::new("config"))
}

/// Like [`load_config`] but reads `default.*` from `dir` and skips `.env`.
pub fn load_config_from(dir: &Path) -> Result<Settings, ConfigError> {
    let default_file = dir.join("default");
    let builder = Config::builder()
        .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("hub.allowed_topics")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        hub: HubSettings {
            allowed_topics: partial
                .hub
                .as_ref()
                .and_then(|h| h.allowed_topics.clone())
                .unwrap_or(default.hub.allowed_topics),
            queue_capacity: partial
                .hub
                .as_ref()
                .and_then(|h| h.queue_capacity)
                .unwrap_or(default.hub.queue_capacity),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}
