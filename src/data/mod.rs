//! Data loading
//!
//! Generator settings live in an external RON file so levels can be tuned
//! without recompiling.

pub mod config;

pub use config::{default_config_path, ConfigError, GeneratorConfig, GroupSpec, Strategy};
