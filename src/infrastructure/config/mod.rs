//! Ambient process configuration.

pub mod engine_config;
pub mod loader;

pub use engine_config::{EngineConfig, LogFormat};
pub use loader::{ConfigError, ConfigLoader};
