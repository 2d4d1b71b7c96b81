// src/core/registry.rs
use crate::core::resolver::Resolution;
use crate::models::full_path::FullPath;
use crate::models::game_path::GamePath;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// The redirection table the hook layer reads from.
///
/// Readers clone the inner `Arc` and drop the lock right away, so a
/// publish never waits on a long lookup and lookups always see one
/// complete pass.
#[derive(Clone, Default)]
pub struct RedirectRegistry {
    current: Arc<RwLock<Arc<Resolution>>>,
}

impl RedirectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current table with `resolution`.
    pub fn publish(&self, resolution: Resolution) {
        debug!(
            "publishing {} redirects and {} edits",
            resolution.redirect_count(),
            resolution.edit_count()
        );
        *self.current.write() = Arc::new(resolution);
    }

    /// The pass currently served.
    pub fn snapshot(&self) -> Arc<Resolution> {
        Arc::clone(&self.current.read())
    }

    /// Real file to serve for `path`, or `None` if no mod overrides it.
    pub fn lookup(&self, path: &GamePath<'_>) -> Option<FullPath> {
        self.snapshot().lookup(path).cloned()
    }

    /// Same as [`Self::lookup`] for a raw, possibly NUL-terminated buffer.
    pub fn lookup_bytes(&self, bytes: &[u8]) -> Option<FullPath> {
        let path = GamePath::from_bytes(bytes)?;
        self.lookup(&path)
    }
}
