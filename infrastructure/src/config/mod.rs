//! Configuration loading.
//!
//! - [`file_config`]: raw TOML structure and validation
//! - [`loader`]: figment-based file discovery and merging

pub mod file_config;
pub mod loader;

pub use file_config::{ConfigValidationError, FileConfig};
pub use loader::ConfigLoader;
