use crate::core::mod_loader::ModLoader;
use crate::core::resolver::{self, ModContribution, Resolution};
use crate::models::error::ModError;
use crate::models::mod_def::{ModDef, ModId};
use crate::models::paths::CollectionPaths;
use crate::models::settings::{CollectionSettings, ModSettings};
use crate::utils::file::FileUtils;
use crate::utils::toml::Toml;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// A set of installed mods together with their per-mod settings.
pub struct Collection {
    pub root: Utf8PathBuf,
    pub paths: CollectionPaths,
    pub settings: CollectionSettings,
    mods: BTreeMap<ModId, ModDef>,
    pub(crate) is_dirty: bool,
}

impl Collection {
    #[instrument]
    pub fn create(root: &Utf8Path, name: &str) -> Result<Self, ModError> {
        let paths = CollectionPaths::new(root);
        std::fs::create_dir_all(&paths.mods)?;

        let inst = Self {
            root: root.to_owned(),
            settings: CollectionSettings {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
                mods: BTreeMap::new(),
            },
            paths,
            mods: BTreeMap::new(),
            is_dirty: false,
        };

        inst.persist()?;
        info!("created collection '{}' at {}", inst.settings.name, inst.root);
        Ok(inst)
    }

    /// Opens an existing collection and brings every mod's settings in line
    /// with its definition on disk.
    #[instrument]
    pub fn load(root: &Utf8Path) -> Result<Self, ModError> {
        let paths = CollectionPaths::new(root);
        let settings: CollectionSettings = Toml::read(&paths.settings)?;

        let mut inst = Self {
            root: root.to_owned(),
            settings,
            mods: BTreeMap::new(),
            paths,
            is_dirty: false,
        };
        for def in ModLoader::discover(&inst.paths.mods)? {
            inst.install(def);
        }

        info!(
            "loaded collection '{}': {} mods, {} settings entries",
            inst.settings.name,
            inst.mods.len(),
            inst.settings.mods.len()
        );
        Ok(inst)
    }

    /// Registers a loaded definition, creating or fixing its settings.
    fn install(&mut self, def: ModDef) {
        match self.settings.mods.get_mut(&def.id) {
            Some(settings) => {
                if settings.fix(&def) {
                    self.is_dirty = true;
                }
            }
            None => {
                self.settings
                    .mods
                    .insert(def.id.clone(), ModSettings::default_for(&def));
                self.is_dirty = true;
            }
        }
        self.mods.insert(def.id.clone(), def);
    }

    pub fn mods(&self) -> impl Iterator<Item = &ModDef> {
        self.mods.values()
    }

    pub fn get_mod(&self, id: &ModId) -> Option<&ModDef> {
        self.mods.get(id)
    }

    pub fn mod_settings(&self, id: &ModId) -> Option<&ModSettings> {
        self.settings.mods.get(id)
    }

    fn settings_mut(&mut self, id: &ModId) -> Result<&mut ModSettings, ModError> {
        if !self.mods.contains_key(id) {
            return Err(ModError::ModNotFound(id.to_string()));
        }
        self.settings
            .mods
            .get_mut(id)
            .ok_or_else(|| ModError::ModNotFound(id.to_string()))
    }

    /// Copies the mod directory at `src` into the collection and loads it.
    /// An existing mod with the same directory name is replaced.
    ///
    /// `src` is loaded first; if that fails the installed mod is left alone.
    /// A failure after the old copy is gone leaves the mod uninstalled.
    #[instrument(skip(self))]
    pub fn add_mod(&mut self, src: &Utf8Path) -> Result<ModId, ModError> {
        let name = src
            .file_name()
            .ok_or_else(|| ModError::InvalidPath(src.to_string()))?;
        ModLoader::load(src)?;

        let id = ModId::from(name);
        let dst = self.paths.mods.join(name);
        self.mods.remove(&id);
        if dst.exists() {
            warn!("replacing existing mod at {dst}");
            std::fs::remove_dir_all(&dst)?;
        }
        FileUtils::copy_recursive(src, &dst)?;

        let def = ModLoader::load(&dst)?;
        self.install(def);
        self.mark_dirty();
        self.persist()?;
        Ok(id)
    }

    /// Re-reads a mod from disk after its files changed. Returns whether its
    /// settings had to be fixed.
    #[instrument(skip(self))]
    pub fn reload_mod(&mut self, id: &ModId) -> Result<bool, ModError> {
        let root = self
            .mods
            .get(id)
            .map(|def| def.root.clone())
            .ok_or_else(|| ModError::ModNotFound(id.to_string()))?;
        let def = ModLoader::load(&root)?;

        let changed = self
            .settings
            .mods
            .get_mut(id)
            .map(|s| s.fix(&def))
            .unwrap_or(true);
        self.install(def);
        if changed {
            self.mark_dirty();
        }
        Ok(changed)
    }

    /// Deletes the mod's files. Its settings stay, so installing it again
    /// restores its configuration.
    #[instrument(skip(self))]
    pub fn remove_mod(&mut self, id: &ModId) -> Result<(), ModError> {
        let def = self
            .mods
            .remove(id)
            .ok_or_else(|| ModError::ModNotFound(id.to_string()))?;
        if def.root.exists() {
            std::fs::remove_dir_all(&def.root)?;
        }
        self.mark_dirty();
        self.persist()?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_enabled(&mut self, id: &ModId, enabled: bool) -> Result<(), ModError> {
        let settings = self.settings_mut(id)?;
        if settings.enabled != enabled {
            settings.enabled = enabled;
            self.mark_dirty();
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_priority(&mut self, id: &ModId, priority: i32) -> Result<(), ModError> {
        let settings = self.settings_mut(id)?;
        if settings.priority != priority {
            settings.priority = priority;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Stores a selection for one group, clamped into its valid range.
    /// Returns the value actually stored.
    #[instrument(skip(self))]
    pub fn set_selection(&mut self, id: &ModId, group: &str, value: u32) -> Result<u32, ModError> {
        let clamped = self
            .mods
            .get(id)
            .ok_or_else(|| ModError::ModNotFound(id.to_string()))?
            .group(group)
            .ok_or_else(|| ModError::GroupNotFound {
                mod_id: id.to_string(),
                group: group.to_string(),
            })?
            .clamp_selection(value);

        let settings = self.settings_mut(id)?;
        if settings.selections.insert(group.to_string(), clamped) != Some(clamped) {
            self.mark_dirty();
        }
        Ok(clamped)
    }

    /// What every enabled, installed mod contributes under its settings.
    pub fn contributions(&self) -> Vec<ModContribution> {
        self.mods
            .values()
            .filter_map(|def| {
                let settings = self.settings.mods.get(&def.id)?;
                settings
                    .enabled
                    .then(|| ModContribution::from_def(def, settings))
            })
            .collect()
    }

    #[instrument(skip(self), fields(collection = %self.settings.name))]
    pub fn resolve(&self) -> Resolution {
        resolver::resolve(self.contributions())
    }

    /// Marks the collection as dirty (modified).
    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Writes `collection.toml`.
    pub fn persist(&self) -> Result<(), ModError> {
        Toml::write(&self.paths.settings, &self.settings)
    }

    /// Persists only when something changed since the last save.
    pub fn save_if_dirty(&mut self) -> Result<(), ModError> {
        if self.is_dirty {
            self.persist()?;
            self.is_dirty = false;
        }
        Ok(())
    }
}
