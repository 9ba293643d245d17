//! Core engine services (configuration)

pub mod config;

pub use config::{CollisionConfig, ConfigError};
