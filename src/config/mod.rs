//! Layered configuration.
//!
//! Merges three layers, lowest to highest precedence:
//! 1. **Defaults** - supplied in memory when the store is created, never persisted
//! 2. **Global** - `<config dir>/<app>/config.json` (`~/.config` on Linux)
//! 3. **Local** - `.<app>.config.json` in the working directory or the
//!    nearest ancestor holding one
//!
//! ## Merge Strategy
//! - Objects: deep merge key by key
//! - Arrays and scalars: replaced by the higher layer

mod files;
mod key_path;
mod merge;
mod store;
mod types;

pub use files::{
    ensure_parent_dir, read_json, remove_dir_if_empty, remove_file, to_pretty_json, write_json,
};
pub use key_path::{IntoKeyPath, KeyPath};
pub use merge::{deep_merge, merge_layers, merge_maps};
pub use store::{ConfigStore, DeleteTrigger, PendingDelete};
pub use types::*;
