use crate::models::game_path::GamePath;
use crate::models::meta_edit::MetaEditId;
use crate::models::mod_def::ModId;
use serde::Serialize;
use std::collections::BTreeMap;

/// One collision, seen from the mod that owns the record.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Conflict<A> {
    pub other: ModId,
    pub artifact: A,
    /// The two priorities differ.
    pub resolved: bool,
    /// This mod's claim is the one installed.
    pub won: bool,
    /// Both claims would produce the same result.
    pub redundant: bool,
}

pub type FileConflict = Conflict<GamePath<'static>>;
pub type EditConflict = Conflict<MetaEditId>;

/// Everything one mod collided on with one other mod.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictSummary {
    pub files: Vec<GamePath<'static>>,
    pub edits: Vec<MetaEditId>,
    /// Every collision with this mod was decided by priority.
    pub resolved: bool,
    /// Every collision with this mod was won.
    pub won_all: bool,
}

/// Collisions per mod, split into file and edit partitions.
///
/// Records are stored for both sides of a collision and sorted by
/// `(other, artifact)`.
#[derive(Serialize, Clone, Debug, Default)]
pub struct ConflictLog {
    files: BTreeMap<ModId, Vec<FileConflict>>,
    edits: BTreeMap<ModId, Vec<EditConflict>>,
}

impl ConflictLog {
    pub(crate) fn from_parts(
        mut files: BTreeMap<ModId, Vec<FileConflict>>,
        mut edits: BTreeMap<ModId, Vec<EditConflict>>,
    ) -> Self {
        for list in files.values_mut() {
            list.sort_by(|a, b| (&a.other, &a.artifact).cmp(&(&b.other, &b.artifact)));
        }
        for list in edits.values_mut() {
            list.sort_by(|a, b| (&a.other, &a.artifact).cmp(&(&b.other, &b.artifact)));
        }
        Self { files, edits }
    }

    pub fn file_conflicts(&self, id: &ModId) -> &[FileConflict] {
        self.files.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edit_conflicts(&self, id: &ModId) -> &[EditConflict] {
        self.edits.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mods with at least one record in either partition.
    pub fn mods(&self) -> impl Iterator<Item = &ModId> {
        let mut ids: Vec<_> = self.files.keys().chain(self.edits.keys()).collect();
        ids.sort();
        ids.dedup();
        ids.into_iter()
    }

    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.edits.is_empty()
    }

    /// Whether some collision involving `id` was a priority tie.
    pub fn has_unresolved(&self, id: &ModId) -> bool {
        self.file_conflicts(id).iter().any(|c| !c.resolved)
            || self.edit_conflicts(id).iter().any(|c| !c.resolved)
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn clear_edits(&mut self) {
        self.edits.clear();
    }

    /// Records of `id` grouped by the other mod.
    pub fn summary(&self, id: &ModId) -> BTreeMap<ModId, ConflictSummary> {
        let mut out: BTreeMap<ModId, ConflictSummary> = BTreeMap::new();
        let fresh = || ConflictSummary {
            resolved: true,
            won_all: true,
            ..Default::default()
        };
        for c in self.file_conflicts(id) {
            let entry = out.entry(c.other.clone()).or_insert_with(fresh);
            entry.files.push(c.artifact.clone());
            entry.resolved &= c.resolved;
            entry.won_all &= c.won;
        }
        for c in self.edit_conflicts(id) {
            let entry = out.entry(c.other.clone()).or_insert_with(fresh);
            entry.edits.push(c.artifact);
            entry.resolved &= c.resolved;
            entry.won_all &= c.won;
        }
        out
    }
}
