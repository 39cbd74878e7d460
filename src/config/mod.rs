//! Configuration: YAML schema and layered loading.

pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, load_config};
pub use schema::TopicGraphConfig;
