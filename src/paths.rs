//! Config file path resolution.
//!
//! - The global file lives in the per-user application config directory
//!   (`dirs::config_dir()`), under `<app name>/config.json`.
//! - The local file is `.<app name>.config.json`, found by walking from the
//!   working directory up through its ancestors, or placed in the working
//!   directory itself.
//!
//! Resolution is pure path manipulation apart from the ancestor search,
//! which only checks for file existence.

use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// File name of the global config inside the application config directory.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// File name of the local config for an application.
pub fn local_config_file_name(app_name: &str) -> String {
    format!(".{}.config.json", app_name)
}

/// Where the resolved local config path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSource {
    /// Found by ancestor search in a directory above the working directory.
    Ancestor,
    /// The working directory (whether or not the file exists there yet).
    WorkingDir,
}

impl std::fmt::Display for LocalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalSource::Ancestor => write!(f, "ancestor"),
            LocalSource::WorkingDir => write!(f, "working directory"),
        }
    }
}

/// Resolved file locations for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Global config file.
    pub global: PathBuf,
    /// Local config file in effect.
    pub local: PathBuf,
    /// How `local` was resolved.
    pub local_source: LocalSource,
    /// Local config file in the working directory.
    pub default_local: PathBuf,
}

/// Resolves config file paths relative to a config home and working directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Overrides the platform config directory when set.
    config_home: Option<PathBuf>,
    /// Absolute working directory the local search starts from.
    working_dir: PathBuf,
}

impl PathResolver {
    /// Resolver using the platform config directory and the process working directory.
    pub fn new() -> ConfigResult<Self> {
        Self::with_dirs(None, None)
    }

    /// Resolver with explicit directories. `None` falls back to the platform
    /// config directory and the process working directory respectively.
    pub fn with_dirs(
        config_home: Option<PathBuf>,
        working_dir: Option<PathBuf>,
    ) -> ConfigResult<Self> {
        let cwd = || std::env::current_dir().map_err(|e| ConfigError::io(Path::new("."), e));

        let working_dir = match working_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd()?.join(dir),
            None => cwd()?,
        };

        Ok(Self {
            config_home,
            working_dir,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Per-user directory holding this application's global config.
    pub fn global_config_dir(&self, app_name: &str) -> ConfigResult<PathBuf> {
        let home = match &self.config_home {
            Some(home) => home.clone(),
            None => dirs::config_dir().ok_or_else(|| {
                ConfigError::io(
                    Path::new(app_name),
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no per-user config directory on this platform",
                    ),
                )
            })?,
        };
        Ok(home.join(app_name))
    }

    /// Path of the global config file.
    pub fn global_config_path(&self, app_name: &str) -> ConfigResult<PathBuf> {
        Ok(self.global_config_dir(app_name)?.join(GLOBAL_CONFIG_FILE))
    }

    /// Path of the local config file in the working directory.
    pub fn default_local_config_path(&self, app_name: &str) -> PathBuf {
        self.working_dir.join(local_config_file_name(app_name))
    }

    /// Closest directory, starting at the working directory, holding a file
    /// named `file_name`. Returns the full file path.
    pub fn find_nearest_ancestor_containing(&self, file_name: &str) -> Option<PathBuf> {
        self.working_dir
            .ancestors()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file())
    }

    /// Path of the local config file in effect, and how it was found.
    pub fn local_config_path(&self, app_name: &str, search_ancestors: bool) -> (PathBuf, LocalSource) {
        let default = self.default_local_config_path(app_name);
        if !search_ancestors {
            return (default, LocalSource::WorkingDir);
        }

        match self.find_nearest_ancestor_containing(&local_config_file_name(app_name)) {
            Some(found) if found != default => (found, LocalSource::Ancestor),
            _ => (default, LocalSource::WorkingDir),
        }
    }

    /// Resolve every path for `app_name`.
    pub fn resolve(&self, app_name: &str, search_ancestors: bool) -> ConfigResult<ConfigPaths> {
        let global = self.global_config_path(app_name)?;
        let (local, local_source) = self.local_config_path(app_name, search_ancestors);
        Ok(ConfigPaths {
            global,
            local,
            local_source,
            default_local: self.default_local_config_path(app_name),
        })
    }
}
