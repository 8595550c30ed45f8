use serde::Deserialize;

use crate::broker::DEFAULT_QUEUE_CAPACITY;

/// Top-level configuration for an embedded hub.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub hub: HubSettings,
    pub logging: LoggingSettings,
}

/// Hub behaviour.
///
/// An empty `allowed_topics` leaves topic names unrestricted.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HubSettings {
    pub allowed_topics: Vec<String>,
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration as read from files or the environment. Missing
/// values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub hub: Option<PartialHubSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub allowed_topics: Option<Vec<String>>,
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hub: HubSettings {
                allowed_topics: Vec::new(),
                queue_capacity: DEFAULT_QUEUE_CAPACITY,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
