//! Property paths into nested configuration objects.
//!
//! A path is either a dotted string (`"editor.font.size"`, with `\.` for a
//! literal dot inside a key) or a sequence of key segments. Both forms must
//! be non-empty. Individual segments may be empty: `"a..b"` addresses the
//! key `""` inside `a`.

use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::fmt;

/// A validated, non-empty sequence of object keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path.
    pub fn parse(dotted: &str) -> ConfigResult<Self> {
        if dotted.is_empty() {
            return Err(ConfigError::invalid("property path", "must not be empty"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = dotted.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'.') => {
                    current.push('.');
                    chars.next();
                }
                '.' => segments.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        segments.push(current);

        Self::from_segments(segments)
    }

    /// Build a path from explicit segments. Segments are taken verbatim.
    pub fn from_segments<I, S>(segments: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ConfigError::invalid("property path", "must not be empty"));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Look the path up inside `value`.
    ///
    /// Returns `None` when a segment is missing or an intermediate value is
    /// not an object. Arrays are not indexed.
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| current.as_object()?.get(segment))
    }

    /// Set the value at this path, creating intermediate objects and
    /// replacing non-object intermediates.
    pub fn insert(&self, map: &mut Map<String, Value>, value: Value) {
        insert_at(map, &self.segments, value);
    }

    /// Remove the value at this path, returning it if it was present.
    pub fn remove(&self, map: &mut Map<String, Value>) -> Option<Value> {
        remove_at(map, &self.segments)
    }
}

fn insert_at(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let child = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            match child {
                Value::Object(child_map) => insert_at(child_map, rest, value),
                other => {
                    let mut child_map = Map::new();
                    insert_at(&mut child_map, rest, value);
                    *other = Value::Object(child_map);
                }
            }
        }
    }
}

fn remove_at(map: &mut Map<String, Value>, segments: &[String]) -> Option<Value> {
    match segments {
        [] => None,
        [last] => map.remove(last),
        [head, rest @ ..] => match map.get_mut(head) {
            Some(Value::Object(child_map)) => remove_at(child_map, rest),
            _ => None,
        },
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.replace('.', "\\."))?;
        }
        Ok(())
    }
}

/// Conversion into a validated [`KeyPath`].
///
/// Strings are parsed as dotted paths; slices, arrays and vectors are taken
/// as segments.
pub trait IntoKeyPath {
    fn into_key_path(self) -> ConfigResult<KeyPath>;
}

impl IntoKeyPath for KeyPath {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        Ok(self)
    }
}

impl IntoKeyPath for &KeyPath {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        Ok(self.clone())
    }
}

impl IntoKeyPath for &str {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::parse(self)
    }
}

impl IntoKeyPath for String {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::parse(&self)
    }
}

impl IntoKeyPath for &String {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::parse(self)
    }
}

impl IntoKeyPath for &[&str] {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::from_segments(self.iter().copied())
    }
}

impl IntoKeyPath for &[String] {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::from_segments(self.iter().cloned())
    }
}

impl<const N: usize> IntoKeyPath for [&str; N] {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::from_segments(self)
    }
}

impl IntoKeyPath for Vec<&str> {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::from_segments(self)
    }
}

impl IntoKeyPath for Vec<String> {
    fn into_key_path(self) -> ConfigResult<KeyPath> {
        KeyPath::from_segments(self)
    }
}
