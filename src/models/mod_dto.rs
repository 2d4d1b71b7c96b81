use crate::models::meta_edit::MetaEdit;
use crate::models::mod_def::GroupType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of `meta.json`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ModManifest {
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

/// Relative path (either separator) to the game paths it replaces.
pub type FileMapDto = BTreeMap<String, Vec<String>>;

/// Contents of `default_mod.json`: the files and edits that are always active.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct DefaultOptionDto {
    pub files: FileMapDto,
    pub edits: Vec<MetaEdit>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct OptionDto {
    pub name: String,
    pub description: String,
    pub files: FileMapDto,
    pub edits: Vec<MetaEdit>,
}

/// Contents of one `group_<NNN>_<name>.json`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GroupDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(default)]
    pub options: Vec<OptionDto>,
}
