use crate::models::error::ModError;
use camino::Utf8Path;

pub struct Toml;

impl Toml {
    pub fn write<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), ModError> {
        toml::to_string(data)
            .map_err(|e| ModError::Parse(e.to_string()))
            .and_then(|t| std::fs::write(path, t).map_err(|e| ModError::Io(format!("{path}: {e}"))))
    }

    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, ModError> {
        let s = std::fs::read_to_string(path).map_err(|e| ModError::Io(format!("{path}: {e}")))?;
        toml::from_str::<T>(&s).map_err(|e| ModError::Parse(format!("{path}: {e}")))
    }
}
