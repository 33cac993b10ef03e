//! Integration tests for the layered configuration store.
//!
//! Each test gets its own config home and working directory under a
//! `TempDir`, so nothing touches the real per-user config directory.

use gitlike_config::config::{ConfigStore, Layer, StoreOptions, read_json};
use gitlike_config::error::ErrorKind;
use gitlike_config::paths::LocalSource;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const APP_NAME: &str = "gitlike-config-test";

/// Temp layout: `<tmp>/home` as config home, `<tmp>/project/sub` as working dir.
struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("project").join("sub")).unwrap();
        Self { temp }
    }

    fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    fn project(&self) -> PathBuf {
        self.temp.path().join("project")
    }

    fn work(&self) -> PathBuf {
        self.project().join("sub")
    }

    fn options(&self) -> StoreOptions {
        StoreOptions::new(APP_NAME)
            .with_config_home(self.home())
            .with_working_dir(self.work())
    }

    fn store(&self) -> ConfigStore {
        ConfigStore::new(self.options()).unwrap()
    }

    fn global_file(&self) -> PathBuf {
        self.home().join(APP_NAME).join("config.json")
    }

    fn local_file(&self) -> PathBuf {
        self.work().join(format!(".{}.config.json", APP_NAME))
    }
}

fn on_disk(path: &std::path::Path) -> Value {
    Value::Object(read_json(path).unwrap())
}

#[test]
fn test_layer_precedence_example() {
    let fx = Fixture::new();
    let mut store = ConfigStore::new(
        fx.options()
            .with_defaults(json!({"override": "default", "x": "d"})),
    )
    .unwrap();
    store
        .write_global_config(json!({"override": "global", "y": "g"}))
        .unwrap();
    store
        .write_local_config(json!({"override": "local", "z": "l"}))
        .unwrap();

    assert_eq!(
        store.effective_config(),
        &json!({"override": "local", "x": "d", "y": "g", "z": "l"})
    );
}

#[test]
fn test_full_workflow() {
    let fx = Fixture::new();
    let mut conf = ConfigStore::new(
        fx.options()
            .with_defaults(json!({"potato": "carrot", "celery": "healthy"}))
            .auto_load(false),
    )
    .unwrap();

    assert_eq!(
        conf.write_local_config(Value::Null).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        conf.write_global_config(Value::Null).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );

    conf.write_local_config(json!({
        "potato": 1337,
        "a": {"nested": {"object": "is fun"}}
    }))
    .unwrap();
    conf.write_global_config(json!({
        "potato": 1000,
        "a": {"nested": {"path": "to nowhere", "object": "should be overridden recursively"}},
        "bagel": true
    }))
    .unwrap();

    assert_eq!(conf.get("potato").unwrap(), Some(&json!(1337)));
    assert_eq!(conf.get("celery").unwrap(), Some(&json!("healthy")));
    assert_eq!(conf.get("bagel").unwrap(), Some(&json!(true)));
    assert_eq!(conf.get("a.nested.path").unwrap(), Some(&json!("to nowhere")));
    assert_eq!(conf.get("a.nested.object").unwrap(), Some(&json!("is fun")));

    conf.set_global("a.nested.object", "is changed globally").unwrap();
    assert_eq!(conf.get("a.nested.object").unwrap(), Some(&json!("is fun")));

    conf.set("a.nested.object", "is changed locally").unwrap();
    assert_eq!(
        conf.get("a.nested.object").unwrap(),
        Some(&json!("is changed locally"))
    );

    // A local config already exists
    assert!(!conf.init_local_config().unwrap());

    let expected_local = fx.local_file();
    conf.delete_local_config_with(|path, trigger| {
        assert_eq!(path, expected_local.as_path());
        trigger.delete()
    })
    .unwrap();
    assert!(!fx.local_file().exists());
    assert!(fx.work().is_dir());
    assert_eq!(conf.get("potato").unwrap(), Some(&json!(1000)));

    assert!(conf.init_local_config().unwrap());
    assert!(fx.local_file().exists());

    conf.delete_local_config().unwrap();
    assert!(!fx.local_file().exists());

    let expected_global = fx.global_file();
    conf.delete_global_config_with(|path, trigger| {
        assert_eq!(path, expected_global.as_path());
        trigger.delete()
    })
    .unwrap();
    assert!(!fx.global_file().exists());
    assert!(!fx.home().join(APP_NAME).exists());
    assert_eq!(conf.get("potato").unwrap(), Some(&json!("carrot")));
}

#[test]
fn test_set_then_get_dotted_and_segments() {
    let fx = Fixture::new();
    let mut store = fx.store();

    store.set("editor.font.size", 14).unwrap();
    assert_eq!(store.get("editor.font.size").unwrap(), Some(&json!(14)));
    assert_eq!(store.get(["editor", "font", "size"]).unwrap(), Some(&json!(14)));

    store.set(vec!["editor", "theme"], "dark").unwrap();
    assert_eq!(store.get("editor.theme").unwrap(), Some(&json!("dark")));

    assert_eq!(
        on_disk(&fx.local_file()),
        json!({"editor": {"font": {"size": 14}, "theme": "dark"}})
    );
}

#[test]
fn test_set_global_is_shadowed_by_local() {
    let fx = Fixture::new();
    let mut store = fx.store();

    store.set("a.b", "Y").unwrap();
    store.set_global("a.b", "X").unwrap();
    assert_eq!(store.get("a.b").unwrap(), Some(&json!("Y")));
    assert_eq!(on_disk(&fx.global_file()), json!({"a": {"b": "X"}}));
}

#[test]
fn test_invalid_writes_leave_file_unchanged() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.write_local_config(json!({"keep": true})).unwrap();
    let before = fs::read_to_string(fx.local_file()).unwrap();

    for bad in [Value::Null, json!(42), json!([]), json!("text")] {
        let err = store.write_local_config(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    assert_eq!(fs::read_to_string(fx.local_file()).unwrap(), before);
    assert_eq!(store.get("keep").unwrap(), Some(&json!(true)));
}

#[test]
fn test_invalid_global_writes_leave_file_unchanged() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.write_global_config(json!({"keep": true})).unwrap();
    let before = fs::read_to_string(fx.global_file()).unwrap();

    for bad in [Value::Null, json!(42), json!([]), json!("text")] {
        let err = store.write_global_config(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    assert_eq!(fs::read_to_string(fx.global_file()).unwrap(), before);
    assert_eq!(store.get("keep").unwrap(), Some(&json!(true)));
    assert_eq!(
        Value::Object(store.read_global_config().unwrap().clone()),
        json!({"keep": true})
    );
}

#[test]
fn test_global_round_trip() {
    let fx = Fixture::new();
    let mut store = fx.store();
    let data = json!({"servers": ["a", "b"], "retry": {"count": 3, "backoff": 1.5}});

    store.write_global_config(data.clone()).unwrap();
    assert_eq!(Value::Object(store.read_global_config().unwrap().clone()), data);
    assert_eq!(on_disk(&fx.global_file()), data);
}

#[test]
fn test_written_file_is_tab_indented_with_newline() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.set("a", 1).unwrap();

    let written = fs::read_to_string(fx.local_file()).unwrap();
    assert_eq!(written, "{\n\t\"a\": 1\n}\n");
}

#[test]
fn test_delete_local_falls_through() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.set_global("color", "blue").unwrap();
    store.set("color", "red").unwrap();

    store.delete_local_config().unwrap();
    assert!(!fx.local_file().exists());
    assert_eq!(store.get("color").unwrap(), Some(&json!("blue")));
    assert!(store.layer(Layer::Local).is_empty());
}

#[test]
fn test_delete_global_keeps_non_empty_dir() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.set_global("a", 1).unwrap();
    let dir = fx.home().join(APP_NAME);
    fs::write(dir.join("cache.db"), "data").unwrap();

    store.delete_global_config().unwrap();
    assert!(!fx.global_file().exists());
    assert!(dir.is_dir());
}

#[test]
fn test_delete_missing_files_is_ok() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.delete_local_config().unwrap();
    store.delete_global_config().unwrap();
}

#[test]
fn test_deferred_delete_confirmation() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.set("a", 1).unwrap();

    let pending = store.request_delete(gitlike_config::Scope::Local);
    // Still there until confirmed
    assert!(fx.local_file().exists());
    assert_eq!(store.get("a").unwrap(), Some(&json!(1)));

    store.confirm_delete(pending).unwrap();
    assert!(!fx.local_file().exists());
    assert_eq!(store.get("a").unwrap(), None);
}

#[test]
fn test_local_found_in_ancestor() {
    let fx = Fixture::new();
    let ancestor_file = fx.project().join(format!(".{}.config.json", APP_NAME));
    fs::write(&ancestor_file, "{\"inherited\": true}\n").unwrap();

    let mut store = fx.store();
    assert_eq!(store.local_config_path(), ancestor_file.as_path());
    assert_eq!(store.local_source(), LocalSource::Ancestor);
    assert_eq!(store.get("inherited").unwrap(), Some(&json!(true)));

    // The ancestor file counts as the existing local config
    assert!(!store.init_local_config().unwrap());
    assert!(!fx.local_file().exists());

    // Writes go to the ancestor file
    store.set("added", 1).unwrap();
    assert_eq!(on_disk(&ancestor_file), json!({"inherited": true, "added": 1}));
}

#[test]
fn test_ancestor_search_disabled() {
    let fx = Fixture::new();
    let ancestor_file = fx.project().join(format!(".{}.config.json", APP_NAME));
    fs::write(&ancestor_file, "{\"inherited\": true}\n").unwrap();

    let mut store = ConfigStore::new(fx.options().look_in_parent_dirs(false)).unwrap();
    assert_eq!(store.local_config_path(), fx.local_file().as_path());
    assert_eq!(store.get("inherited").unwrap(), None);

    assert!(store.init_local_config().unwrap());
    assert_eq!(fs::read_to_string(fx.local_file()).unwrap(), "{}\n");
}

#[test]
fn test_init_after_ancestor_removed_uses_working_dir() {
    let fx = Fixture::new();
    let ancestor_file = fx.project().join(format!(".{}.config.json", APP_NAME));
    fs::write(&ancestor_file, "{\"inherited\": true}\n").unwrap();

    let mut store = fx.store();
    store.delete_local_config().unwrap();
    assert!(!ancestor_file.exists());

    assert!(store.init_local_config().unwrap());
    assert_eq!(store.local_config_path(), fx.local_file().as_path());
    assert_eq!(store.local_source(), LocalSource::WorkingDir);
    assert_eq!(store.get("inherited").unwrap(), None);
    assert_eq!(store.effective_config(), &json!({}));
}

#[test]
fn test_init_keeps_existing_file() {
    let fx = Fixture::new();
    fs::write(fx.local_file(), "{\"x\": 1}\n").unwrap();

    let mut store = fx.store();
    assert!(!store.init_local_config().unwrap());
    assert_eq!(fs::read_to_string(fx.local_file()).unwrap(), "{\"x\": 1}\n");
}

#[test]
fn test_invalid_json_propagates() {
    let fx = Fixture::new();
    fs::write(fx.local_file(), "{ nope").unwrap();

    let err = ConfigStore::new(fx.options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let mut store = ConfigStore::new(fx.options().auto_load(false)).unwrap();
    assert_eq!(store.load().unwrap_err().kind(), ErrorKind::Parse);
    assert_eq!(store.read_local_config().unwrap_err().kind(), ErrorKind::Parse);
}

#[test]
fn test_read_does_not_recompute() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.set("a", 1).unwrap();

    fs::write(fx.local_file(), "{\"a\": 2}\n").unwrap();
    assert_eq!(
        Value::Object(store.read_local_config().unwrap().clone()),
        json!({"a": 2})
    );
    assert_eq!(store.get("a").unwrap(), Some(&json!(1)));

    store.load().unwrap();
    assert_eq!(store.get("a").unwrap(), Some(&json!(2)));
}

#[test]
fn test_defaults_never_written() {
    let fx = Fixture::new();
    let mut store = ConfigStore::new(fx.options().with_defaults(json!({"d": 1}))).unwrap();
    store.set("l", 2).unwrap();
    store.set_global("g", 3).unwrap();

    assert_eq!(on_disk(&fx.local_file()), json!({"l": 2}));
    assert_eq!(on_disk(&fx.global_file()), json!({"g": 3}));
    assert_eq!(Value::Object(store.layer(Layer::Defaults).clone()), json!({"d": 1}));
}

#[test]
fn test_arrays_replaced_across_layers() {
    let fx = Fixture::new();
    let mut store =
        ConfigStore::new(fx.options().with_defaults(json!({"plugins": ["a", "b", "c"]}))).unwrap();
    store.set("plugins", json!(["z"])).unwrap();
    assert_eq!(store.get("plugins").unwrap(), Some(&json!(["z"])));
}

#[test]
fn test_load_is_idempotent() {
    let fx = Fixture::new();
    let mut store = fx.store();
    store.set("a", 1).unwrap();
    let before = store.effective_config().clone();

    store.load().unwrap();
    store.load().unwrap();
    assert_eq!(store.effective_config(), &before);
}
