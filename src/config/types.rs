//! Store construction options and layer identifiers.

use serde_json::{Map, Value};
use std::path::PathBuf;

/// Configuration layer, lowest to highest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// In-memory defaults supplied at construction (lowest priority)
    Defaults = 0,
    /// Per-user file in the platform config directory
    Global = 1,
    /// Directory-scoped file (highest priority)
    Local = 2,
}

impl Layer {
    /// All layers in merge order.
    pub const ALL: [Layer; 3] = [Layer::Defaults, Layer::Global, Layer::Local];
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Defaults => write!(f, "defaults"),
            Layer::Global => write!(f, "global"),
            Layer::Local => write!(f, "local"),
        }
    }
}

/// A layer that is persisted to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Local,
}

impl From<Scope> for Layer {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Global => Layer::Global,
            Scope::Local => Layer::Local,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Layer::from(*self).fmt(f)
    }
}

/// Options for [`ConfigStore::new`](super::ConfigStore::new).
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Application name; seeds both file paths.
    pub name: String,
    /// Lowest-precedence values. Must be a JSON object.
    pub defaults: Value,
    /// Search ancestor directories for an existing local config.
    pub look_in_parent_dirs: bool,
    /// Load both files during construction.
    pub auto_load: bool,
    /// Overrides the platform config directory.
    pub config_home: Option<PathBuf>,
    /// Overrides the process working directory for local config lookup.
    pub working_dir: Option<PathBuf>,
}

impl StoreOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: Value::Object(Map::new()),
            look_in_parent_dirs: true,
            auto_load: true,
            config_home: None,
            working_dir: None,
        }
    }

    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn look_in_parent_dirs(mut self, enabled: bool) -> Self {
        self.look_in_parent_dirs = enabled;
        self
    }

    pub fn auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    pub fn with_config_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_home = Some(dir.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}
