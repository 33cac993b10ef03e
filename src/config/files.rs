//! Synchronous JSON file access for persisted layers.
//!
//! A missing file reads as an empty object. Writes are tab-indented with a
//! trailing newline so the files stay pleasant to edit by hand.

use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read a JSON object from `path`, or an empty object if the file does not exist.
pub fn read_json(path: &Path) -> ConfigResult<Map<String, Value>> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using empty layer");
            return Ok(Map::new());
        }
        Err(e) => return Err(ConfigError::io(path, e)),
    };

    match serde_json::from_slice::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::not_an_object(path)),
        Err(e) => Err(ConfigError::parse(path, e)),
    }
}

/// Serialize `value` as tab-indented JSON followed by a newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `value` to `path`, replacing any existing file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ConfigResult<()> {
    let bytes = to_pretty_json(value).map_err(|e| ConfigError::parse(path, e))?;
    std::fs::write(path, bytes).map_err(|e| ConfigError::io(path, e))?;
    debug!(path = %path.display(), "wrote config file");
    Ok(())
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> ConfigResult<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() {
        return Ok(());
    }

    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(ConfigError::io(
            dir,
            std::io::Error::other("exists but is not a directory"),
        ));
    }

    std::fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
    debug!(dir = %dir.display(), "created config directory");
    Ok(())
}

/// Remove the file at `path` if present. A missing file is not an error.
pub fn remove_file(path: &Path) -> ConfigResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed config file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::io(path, e)),
    }
}

/// Remove `dir` if nothing is left in it. A missing or non-empty directory
/// is left alone.
pub fn remove_dir_if_empty(dir: &Path) -> ConfigResult<()> {
    let mut entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ConfigError::io(dir, e)),
    };
    if entries.next().is_some() {
        return Ok(());
    }

    match std::fs::remove_dir(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "removed empty config directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::io(dir, e)),
    }
}
