//! Application configuration module.
//!
//! Manages TOML-based config files for user settings such as the
//! response language and adult-content filter.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TmdbConfig};
pub use paths::resolve_config_path;
