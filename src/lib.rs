//! gitlike-config
//!
//! Layered JSON configuration for command-line tools: in-memory defaults, a
//! per-user global file and a directory-scoped local file, merged into one
//! effective configuration.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::{ConfigStore, KeyPath, Layer, Scope, StoreOptions};
pub use error::{ConfigError, ConfigResult, ErrorKind};
