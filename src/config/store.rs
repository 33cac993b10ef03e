//! Layered configuration store.
//!
//! Holds the defaults, global and local layers, keeps the merged view in sync
//! with them, and persists the two file-backed layers.

use super::files;
use super::key_path::IntoKeyPath;
use super::merge::merge_layers;
use super::types::{Layer, Scope, StoreOptions};
use crate::error::{ConfigError, ConfigResult};
use crate::paths::{ConfigPaths, LocalSource, PathResolver};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration store merging defaults < global < local.
///
/// The effective configuration is recomputed after every load and every
/// write, so it always reflects the current layers. In-memory layers only
/// change once the corresponding disk write has succeeded.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    name: String,
    look_in_parent_dirs: bool,
    paths: ConfigPaths,
    defaults: Map<String, Value>,
    global: Map<String, Value>,
    local: Map<String, Value>,
    effective: Value,
}

impl ConfigStore {
    /// Create a store, resolving both file paths and loading them when
    /// `auto_load` is set.
    pub fn new(options: StoreOptions) -> ConfigResult<Self> {
        if options.name.is_empty() {
            return Err(ConfigError::invalid(
                "application name",
                "must be a non-empty string",
            ));
        }
        let defaults = match options.defaults {
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::invalid(
                    "defaults",
                    format!("must be a JSON object, got {}", describe(&other)),
                ));
            }
        };

        let resolver = PathResolver::with_dirs(options.config_home, options.working_dir)?;
        let paths = resolver.resolve(&options.name, options.look_in_parent_dirs)?;
        debug!(
            app = %options.name,
            global = %paths.global.display(),
            local = %paths.local.display(),
            local_source = %paths.local_source,
            "resolved config paths"
        );

        let mut store = Self {
            name: options.name,
            look_in_parent_dirs: options.look_in_parent_dirs,
            paths,
            defaults,
            global: Map::new(),
            local: Map::new(),
            effective: Value::Object(Map::new()),
        };
        store.recompute();

        if options.auto_load {
            store.load()?;
        }
        Ok(store)
    }

    /// Read both files from disk and recompute the effective configuration.
    pub fn load(&mut self) -> ConfigResult<()> {
        let global = files::read_json(&self.paths.global)?;
        let local = files::read_json(&self.paths.local)?;
        self.global = global;
        self.local = local;
        self.recompute();
        debug!(app = %self.name, "loaded config layers");
        Ok(())
    }

    fn recompute(&mut self) {
        self.effective = merge_layers([&self.defaults, &self.global, &self.local]);
    }

    /// The merged configuration. No I/O.
    pub fn effective_config(&self) -> &Value {
        &self.effective
    }

    /// Look up a key path in the effective configuration.
    ///
    /// Returns `Ok(None)` when any segment is missing or passes through a
    /// value that is not an object.
    pub fn get(&self, path: impl IntoKeyPath) -> ConfigResult<Option<&Value>> {
        let path = path.into_key_path()?;
        Ok(path.lookup(&self.effective))
    }

    /// Like [`get`](Self::get), falling back to `default`.
    pub fn get_or(&self, path: impl IntoKeyPath, default: impl Into<Value>) -> ConfigResult<Value> {
        Ok(self.get(path)?.cloned().unwrap_or_else(|| default.into()))
    }

    /// Look up a key path and deserialize the value.
    pub fn get_as<T: DeserializeOwned>(&self, path: impl IntoKeyPath) -> ConfigResult<Option<T>> {
        let path = path.into_key_path()?;
        match path.lookup(&self.effective) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConfigError::invalid("value", format!("{}: {}", path, e))),
        }
    }

    /// Whether a key path is present in the effective configuration.
    pub fn has(&self, path: impl IntoKeyPath) -> ConfigResult<bool> {
        Ok(self.get(path)?.is_some())
    }

    /// Set a key in the local layer and persist it.
    pub fn set(&mut self, path: impl IntoKeyPath, value: impl Into<Value>) -> ConfigResult<()> {
        self.set_in(Scope::Local, path, value.into())
    }

    /// Set a key in the global layer and persist it.
    pub fn set_global(
        &mut self,
        path: impl IntoKeyPath,
        value: impl Into<Value>,
    ) -> ConfigResult<()> {
        self.set_in(Scope::Global, path, value.into())
    }

    fn set_in(&mut self, scope: Scope, path: impl IntoKeyPath, value: Value) -> ConfigResult<()> {
        let path = path.into_key_path()?;
        let mut data = self.scope_layer(scope).clone();
        path.insert(&mut data, value);
        self.persist(scope, data)?;
        debug!(app = %self.name, layer = %scope, key = %path, "set config value");
        Ok(())
    }

    /// Remove a key from the local layer. Returns whether it was present.
    pub fn unset(&mut self, path: impl IntoKeyPath) -> ConfigResult<bool> {
        self.unset_in(Scope::Local, path)
    }

    /// Remove a key from the global layer. Returns whether it was present.
    pub fn unset_global(&mut self, path: impl IntoKeyPath) -> ConfigResult<bool> {
        self.unset_in(Scope::Global, path)
    }

    fn unset_in(&mut self, scope: Scope, path: impl IntoKeyPath) -> ConfigResult<bool> {
        let path = path.into_key_path()?;
        let mut data = self.scope_layer(scope).clone();
        if path.remove(&mut data).is_none() {
            return Ok(false);
        }
        self.persist(scope, data)?;
        debug!(app = %self.name, layer = %scope, key = %path, "removed config value");
        Ok(true)
    }

    /// Replace the whole local layer. `data` must be a JSON object.
    pub fn write_local_config(&mut self, data: Value) -> ConfigResult<()> {
        let data = into_object(data)?;
        self.persist(Scope::Local, data)
    }

    /// Replace the whole global layer. `data` must be a JSON object.
    pub fn write_global_config(&mut self, data: Value) -> ConfigResult<()> {
        let data = into_object(data)?;
        self.persist(Scope::Global, data)
    }

    fn persist(&mut self, scope: Scope, data: Map<String, Value>) -> ConfigResult<()> {
        match scope {
            Scope::Global => {
                files::ensure_parent_dir(&self.paths.global)?;
                files::write_json(&self.paths.global, &data)?;
                self.global = data;
            }
            Scope::Local => {
                files::write_json(&self.paths.local, &data)?;
                self.local = data;
            }
        }
        self.recompute();
        Ok(())
    }

    /// Re-read the local file into the local layer.
    ///
    /// The effective configuration is left as is until the next
    /// [`load`](Self::load) or write.
    pub fn read_local_config(&mut self) -> ConfigResult<&Map<String, Value>> {
        self.local = files::read_json(&self.paths.local)?;
        Ok(&self.local)
    }

    /// Re-read the global file into the global layer.
    ///
    /// The effective configuration is left as is until the next
    /// [`load`](Self::load) or write.
    pub fn read_global_config(&mut self) -> ConfigResult<&Map<String, Value>> {
        self.global = files::read_json(&self.paths.global)?;
        Ok(&self.global)
    }

    /// Delete the local file immediately. Its directory is kept.
    pub fn delete_local_config(&mut self) -> ConfigResult<()> {
        let pending = self.request_delete(Scope::Local);
        self.confirm_delete(pending)
    }

    /// Delete the global file immediately, along with its directory if that
    /// is left empty.
    pub fn delete_global_config(&mut self) -> ConfigResult<()> {
        let pending = self.request_delete(Scope::Global);
        self.confirm_delete(pending)
    }

    /// Delete the local file once `confirm` fires the trigger it is handed.
    ///
    /// Dropping the trigger cancels the deletion.
    pub fn delete_local_config_with<F>(&mut self, confirm: F) -> ConfigResult<()>
    where
        F: FnOnce(&Path, DeleteTrigger<'_>) -> ConfigResult<()>,
    {
        self.delete_with(Scope::Local, confirm)
    }

    /// Delete the global file once `confirm` fires the trigger it is handed.
    ///
    /// Dropping the trigger cancels the deletion.
    pub fn delete_global_config_with<F>(&mut self, confirm: F) -> ConfigResult<()>
    where
        F: FnOnce(&Path, DeleteTrigger<'_>) -> ConfigResult<()>,
    {
        self.delete_with(Scope::Global, confirm)
    }

    fn delete_with<F>(&mut self, scope: Scope, confirm: F) -> ConfigResult<()>
    where
        F: FnOnce(&Path, DeleteTrigger<'_>) -> ConfigResult<()>,
    {
        let pending = self.request_delete(scope);
        let path = pending.path.clone();
        confirm(
            &path,
            DeleteTrigger {
                store: self,
                pending,
            },
        )
    }

    /// Start a deletion that is confirmed later with
    /// [`confirm_delete`](Self::confirm_delete). Nothing is touched until then.
    pub fn request_delete(&self, scope: Scope) -> PendingDelete {
        PendingDelete {
            scope,
            path: self.scope_path(scope).to_path_buf(),
        }
    }

    /// Carry out a deletion started with [`request_delete`](Self::request_delete).
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> ConfigResult<()> {
        files::remove_file(&pending.path)?;
        info!(
            app = %self.name,
            layer = %pending.scope,
            path = %pending.path.display(),
            "deleted config file"
        );

        // The file is gone; the layer must follow even if the directory
        // cleanup below fails.
        if pending.path == self.scope_path(pending.scope) {
            match pending.scope {
                Scope::Global => self.global = Map::new(),
                Scope::Local => self.local = Map::new(),
            }
            self.recompute();
        }

        if pending.scope == Scope::Global {
            if let Some(dir) = pending.path.parent() {
                files::remove_dir_if_empty(dir)?;
            }
        }
        Ok(())
    }

    /// Create an empty local config in the working directory.
    ///
    /// Returns `false` without touching anything when ancestor search found
    /// an existing local config, or when one already exists in the working
    /// directory.
    pub fn init_local_config(&mut self) -> ConfigResult<bool> {
        if self.look_in_parent_dirs
            && self.paths.local_source == LocalSource::Ancestor
            && self.paths.local.is_file()
        {
            return Ok(false);
        }

        let default = self.paths.default_local.clone();
        if default.exists() {
            return Ok(false);
        }

        let empty = Map::new();
        files::write_json(&default, &empty)?;
        info!(app = %self.name, path = %default.display(), "initialized local config");

        self.paths.local = default;
        self.paths.local_source = LocalSource::WorkingDir;
        self.local = empty;
        self.recompute();
        Ok(true)
    }

    fn scope_layer(&self, scope: Scope) -> &Map<String, Value> {
        match scope {
            Scope::Global => &self.global,
            Scope::Local => &self.local,
        }
    }

    fn scope_path(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Global => &self.paths.global,
            Scope::Local => &self.paths.local,
        }
    }

    /// Current contents of a layer.
    pub fn layer(&self, layer: Layer) -> &Map<String, Value> {
        match layer {
            Layer::Defaults => &self.defaults,
            Layer::Global => &self.global,
            Layer::Local => &self.local,
        }
    }

    /// Application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_config_path(&self) -> &Path {
        &self.paths.local
    }

    pub fn global_config_path(&self) -> &Path {
        &self.paths.global
    }

    /// How the local config path was resolved.
    pub fn local_source(&self) -> LocalSource {
        self.paths.local_source
    }
}

/// A deletion awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    scope: Scope,
    path: PathBuf,
}

impl PendingDelete {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// File that will be removed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Handed to a delete confirmation callback; calling [`delete`](Self::delete)
/// performs the deletion.
pub struct DeleteTrigger<'a> {
    store: &'a mut ConfigStore,
    pending: PendingDelete,
}

impl DeleteTrigger<'_> {
    pub fn path(&self) -> &Path {
        &self.pending.path
    }

    pub fn delete(self) -> ConfigResult<()> {
        self.store.confirm_delete(self.pending)
    }
}

fn into_object(data: Value) -> ConfigResult<Map<String, Value>> {
    match data {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::invalid(
            "config data",
            format!("must be a JSON object, got {}", describe(&other)),
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
