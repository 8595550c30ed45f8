pub mod engine;
mod fanout;
pub mod options;
pub mod registry;
pub mod topic;

pub use engine::Hub;
pub use options::{DEFAULT_QUEUE_CAPACITY, Options};
pub use registry::Registry;
pub use topic::Topic;
