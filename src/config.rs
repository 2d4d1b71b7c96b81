pub mod global;

use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "mod_overlay";

/// Application-wide settings, stored by `confy` in the user config dir.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub version: u8,
    /// Where new collections are created.
    pub collections_root: Utf8PathBuf,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Directory for daily log files; no file logging when unset.
    pub log_dir: Option<Utf8PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "martes", APP_NAME)
}

impl Default for AppSettings {
    fn default() -> Self {
        let base_dir = project_dirs()
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).ok())
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe_path| exe_path.parent().map(|p| p.to_path_buf()))
                    .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            })
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        Self {
            version: 0,
            collections_root: base_dir.join("collections"),
            log_level: "info".to_string(),
            log_dir: Some(base_dir.join("logs")),
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, confy::ConfyError> {
        confy::load(APP_NAME, None)
    }

    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, None, self)
    }
}
