//! Application configuration module.
//!
//! Reads the TOML file holding service, timing and home-screen settings.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{log_path, resolve_config_path};
