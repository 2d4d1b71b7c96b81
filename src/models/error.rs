use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Display, Error, Clone, PartialEq)]
pub enum ModError {
    #[display("I/O error: {_0}")]
    Io(#[error(not(source))] String),
    #[display("Parse error: {_0}")]
    Parse(#[error(not(source))] String),
    #[display("Invalid path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    #[display("Mod not found: {_0}")]
    ModNotFound(#[error(not(source))] String),
    #[display("Option group '{group}' not found in mod '{mod_id}'")]
    GroupNotFound { mod_id: String, group: String },
    #[display("Option group '{group}' declared twice in mod '{mod_id}'")]
    DuplicateGroup { mod_id: String, group: String },
    #[display("Multi group '{group}' has {count} options, at most {max} are supported")]
    TooManyOptions {
        group: String,
        count: usize,
        max: usize,
    },
    #[display("Config error: {_0}")]
    Config(#[error(not(source))] String),
}

impl From<std::io::Error> for ModError {
    fn from(e: std::io::Error) -> Self {
        ModError::Io(e.to_string())
    }
}

impl From<walkdir::Error> for ModError {
    fn from(e: walkdir::Error) -> Self {
        ModError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ModError {
    fn from(e: serde_json::Error) -> Self {
        ModError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for ModError {
    fn from(e: toml::de::Error) -> Self {
        ModError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for ModError {
    fn from(e: toml::ser::Error) -> Self {
        ModError::Parse(e.to_string())
    }
}

impl From<confy::ConfyError> for ModError {
    fn from(e: confy::ConfyError) -> Self {
        ModError::Config(e.to_string())
    }
}
