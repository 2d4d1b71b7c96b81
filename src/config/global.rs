// src/config/global.rs
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How many collections the recent list remembers.
pub const MAX_RECENT: usize = 10;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    pub last_opened: Option<Utf8PathBuf>,
    pub known_collections: Vec<Utf8PathBuf>,
}

impl GlobalConfig {
    /// Moves `root` to the front of the recent list and marks it last opened.
    pub fn update_recent(&mut self, root: &Utf8Path) {
        self.known_collections.retain(|p| p != root);
        self.known_collections.insert(0, root.to_owned());
        self.known_collections.truncate(MAX_RECENT);
        self.last_opened = Some(root.to_owned());
    }

    pub fn forget(&mut self, root: &Utf8Path) {
        self.known_collections.retain(|p| p != root);
        if self.last_opened.as_deref() == Some(root) {
            self.last_opened = None;
        }
    }
}

pub fn load_config() -> GlobalConfig {
    confy::load("mod_overlay", "global").unwrap_or_else(|e| {
        warn!("failed to read global config, using defaults: {e}");
        GlobalConfig::default()
    })
}

pub fn save_config(config: &GlobalConfig) {
    if let Err(e) = confy::store("mod_overlay", "global", config) {
        warn!("failed to save global config: {e}");
    }
}
