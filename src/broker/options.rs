use crate::config::HubSettings;

/// Default number of payloads a topic queues before `publish` waits.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Hub options, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Topic names that may be subscribed to. Empty allows every name.
    pub allowed_topics: Vec<String>,
    /// Capacity of each topic's delivery queue.
    pub queue_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allowed_topics: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Options {
    pub fn allow_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

impl From<&HubSettings> for Options {
    fn from(settings: &HubSettings) -> Self {
        Self {
            allowed_topics: settings.allowed_topics.clone(),
            queue_capacity: settings.queue_capacity,
        }
    }
}
