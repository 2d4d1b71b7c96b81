use crate::models::error::ModError;
use crate::models::game_path::GamePath;
use crate::models::meta_edit::MetaEdit;
use crate::models::rel_path::RelPath;
use camino::Utf8PathBuf;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Multi groups store their selection as a `u32` bit mask.
pub const MAX_MULTI_OPTIONS: usize = 32;

/// Stable mod identity, derived from the mod's directory name.
#[derive(Serialize, Deserialize, Display, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ModId(pub String);

impl From<&str> for ModId {
    fn from(s: &str) -> Self {
        ModId(s.to_string())
    }
}

impl ModId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupType {
    /// Exactly one option is active.
    Single,
    /// Any subset of options is active.
    Multi,
}

/// Relative file to the game paths it serves.
pub type FileMap = BTreeMap<RelPath<'static>, BTreeSet<GamePath<'static>>>;

#[derive(Clone, Debug, Default)]
pub struct ModOption {
    pub name: String,
    pub description: String,
    pub files: FileMap,
    pub edits: Vec<MetaEdit>,
}

impl ModOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds `game` as a target of `rel`.
    pub fn with_file(mut self, rel: RelPath<'static>, game: GamePath<'static>) -> Self {
        self.files.entry(rel).or_default().insert(game);
        self
    }

    pub fn with_edit(mut self, edit: MetaEdit) -> Self {
        self.edits.push(edit);
        self
    }
}

#[derive(Clone, Debug)]
pub struct OptionGroup {
    pub name: String,
    pub description: String,
    pub group_type: GroupType,
    pub options: Vec<ModOption>,
}

impl OptionGroup {
    pub fn new(name: impl Into<String>, group_type: GroupType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            group_type,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: ModOption) -> Self {
        self.options.push(option);
        self
    }

    /// Clamps a stored selection into range for the current options.
    pub fn clamp_selection(&self, value: u32) -> u32 {
        let count = self.options.len();
        match self.group_type {
            GroupType::Single => value.min(count.saturating_sub(1) as u32),
            GroupType::Multi if count >= MAX_MULTI_OPTIONS => value,
            GroupType::Multi => value & ((1u32 << count) - 1),
        }
    }

    /// Options switched on by `selection`.
    ///
    /// Single groups fall back to the first option when the index is out of
    /// range, so stale settings still resolve.
    pub fn contributing(&self, selection: u32) -> impl Iterator<Item = (usize, &ModOption)> {
        let single = match self.group_type {
            GroupType::Single if !self.options.is_empty() => {
                let idx = selection as usize;
                Some(if idx < self.options.len() { idx } else { 0 })
            }
            _ => None,
        };
        let multi = self.group_type == GroupType::Multi;
        self.options.iter().enumerate().filter(move |(i, _)| {
            if multi {
                *i < MAX_MULTI_OPTIONS && selection & (1 << *i) != 0
            } else {
                single == Some(*i)
            }
        })
    }
}

/// Static description of one installed mod.
#[derive(Clone, Debug)]
pub struct ModDef {
    pub id: ModId,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
    /// Directory the relative paths are resolved against.
    pub root: Utf8PathBuf,
    /// Always-active files.
    pub default_files: FileMap,
    /// Always-active edits.
    pub default_edits: Vec<MetaEdit>,
    pub groups: Vec<OptionGroup>,
    /// Every file found below `root`, served under its own path unless a group claims it.
    pub files: BTreeSet<RelPath<'static>>,
}

impl ModDef {
    pub fn new(id: impl Into<ModId>, root: impl Into<Utf8PathBuf>) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            author: String::new(),
            version: String::new(),
            description: String::new(),
            root: root.into(),
            default_files: FileMap::new(),
            default_edits: Vec::new(),
            groups: Vec::new(),
            files: BTreeSet::new(),
        }
    }

    /// Appends a group, rejecting duplicate names and oversized multi groups.
    pub fn add_group(&mut self, group: OptionGroup) -> Result<(), ModError> {
        if self.group(&group.name).is_some() {
            return Err(ModError::DuplicateGroup {
                mod_id: self.id.to_string(),
                group: group.name,
            });
        }
        if group.group_type == GroupType::Multi && group.options.len() > MAX_MULTI_OPTIONS {
            return Err(ModError::TooManyOptions {
                group: group.name,
                count: group.options.len(),
                max: MAX_MULTI_OPTIONS,
            });
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn with_group(mut self, group: OptionGroup) -> Result<Self, ModError> {
        self.add_group(group)?;
        Ok(self)
    }

    pub fn with_default_file(mut self, rel: RelPath<'static>, game: GamePath<'static>) -> Self {
        self.default_files.entry(rel).or_default().insert(game);
        self
    }

    pub fn with_default_edit(mut self, edit: MetaEdit) -> Self {
        self.default_edits.push(edit);
        self
    }

    pub fn with_file(mut self, rel: RelPath<'static>) -> Self {
        self.files.insert(rel);
        self
    }

    pub fn group(&self, name: &str) -> Option<&OptionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl From<String> for ModId {
    fn from(s: String) -> Self {
        ModId(s)
    }
}
