#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use mod_overlay_lib::core::collection::Collection;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Temporary directory and its UTF-8 path.
pub fn setup_test_env() -> (TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    (tmp, root)
}

/// Fresh collection in a temporary directory.
pub fn setup_collection() -> (TempDir, Collection) {
    let (tmp, root) = setup_test_env();
    let collection = Collection::create(&root.join("collection"), "Test").unwrap();
    (tmp, collection)
}

/// Writes a mod directory piece by piece.
pub struct TestMod {
    pub root: Utf8PathBuf,
}

impl TestMod {
    pub fn new(parent: &Utf8Path, id: &str) -> Self {
        let root = parent.join(id);
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// Adds a content file; `rel` uses `/`.
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn meta(self, name: &str) -> Self {
        let meta = serde_json::json!({ "name": name, "author": "test", "version": "1.0.0" });
        self.json("meta.json", &meta)
    }

    pub fn default_option(self, value: Value) -> Self {
        self.json("default_mod.json", &value)
    }

    pub fn group(self, file_name: &str, value: Value) -> Self {
        self.json(file_name, &value)
    }

    pub fn json(self, file_name: &str, value: &Value) -> Self {
        fs::write(self.root.join(file_name), serde_json::to_string_pretty(value).unwrap()).unwrap();
        self
    }

    pub fn raw(self, file_name: &str, text: &str) -> Self {
        fs::write(self.root.join(file_name), text).unwrap();
        self
    }
}

/// Mod with one always-active file at `game`, stored as `rel`.
pub fn swap_mod(parent: &Utf8Path, id: &str, rel: &str, game: &str) -> TestMod {
    TestMod::new(parent, id)
        .file(rel, id)
        .default_option(serde_json::json!({ "files": { rel: [game] } }))
}
