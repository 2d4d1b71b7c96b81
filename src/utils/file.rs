use crate::models::error::ModError;
use camino::Utf8Path;
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Recursively copies a directory tree from source to destination.
    /// Creates all necessary directories and overwrites existing files.
    pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), ModError> {
        std::fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src) {
            let entry = entry?;
            let src_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                ModError::InvalidPath(format!("non UTF-8 path: {:?}", entry.path()))
            })?;
            let rel_path = src_path
                .strip_prefix(src)
                .map_err(|e| ModError::InvalidPath(e.to_string()))?;
            let dst_path = dst.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dst_path)?;
            } else {
                if let Some(parent) = dst_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(src_path, &dst_path)?;
            }
        }

        Ok(())
    }
}
