use crate::core::mod_files::{edits_for_config, files_for_config};
use crate::models::conflict::{Conflict, ConflictLog};
use crate::models::full_path::FullPath;
use crate::models::game_path::GamePath;
use crate::models::meta_edit::{EquipSlot, MetaEdit, MetaEditId};
use crate::models::mod_def::{ModDef, ModId};
use crate::models::settings::ModSettings;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use tracing::{debug, warn};

/// What one enabled mod puts on the table for a resolution pass.
#[derive(Clone, Debug)]
pub struct ModContribution {
    pub id: ModId,
    pub priority: i32,
    pub files: HashMap<GamePath<'static>, FullPath>,
    pub edits: Vec<MetaEdit>,
}

impl ModContribution {
    /// Reduces a mod to the files and edits its settings select.
    ///
    /// If two files of the mod target the same game path, the one whose
    /// relative path sorts first is kept.
    pub fn from_def(def: &ModDef, settings: &ModSettings) -> Self {
        let mut files = HashMap::new();
        for (rel, games) in files_for_config(def, settings) {
            let Some(full) = FullPath::from_rel(&def.root, &rel) else {
                warn!("{}: cannot place '{}' below {}", def.id, rel, def.root);
                continue;
            };
            for game in games {
                match files.entry(game) {
                    Entry::Vacant(e) => {
                        e.insert(full.clone());
                    }
                    Entry::Occupied(e) => {
                        debug!("{}: '{}' already served by {}, ignoring {}", def.id, e.key(), e.get(), rel);
                    }
                }
            }
        }

        Self {
            id: def.id.clone(),
            priority: settings.priority,
            files,
            edits: edits_for_config(def, settings).into_values().collect(),
        }
    }
}

/// The installed claim for one game path.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub path: FullPath,
    pub owner: ModId,
}

/// The installed claim for one edit identity.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AppliedEdit {
    pub edit: MetaEdit,
    pub owner: ModId,
}

/// Output of one resolution pass.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    redirects: HashMap<GamePath<'static>, Redirect>,
    edits: HashMap<MetaEditId, AppliedEdit>,
    conflicts: ConflictLog,
}

impl Resolution {
    /// Real file to serve for `path`, if some mod overrides it.
    ///
    /// `path` may borrow a short-lived buffer; the answer then lives no
    /// longer than that buffer.
    pub fn lookup<'a>(&'a self, path: &GamePath<'a>) -> Option<&'a FullPath> {
        self.redirect(path).map(|r| &r.path)
    }

    pub fn redirect<'a>(&'a self, path: &GamePath<'a>) -> Option<&'a Redirect> {
        let table: &'a HashMap<GamePath<'a>, Redirect> = &self.redirects;
        table.get(path)
    }

    pub fn redirects(&self) -> impl Iterator<Item = (&GamePath<'static>, &Redirect)> {
        self.redirects.iter()
    }

    /// Redirects ordered by game path.
    pub fn sorted_redirects(&self) -> Vec<(&GamePath<'static>, &Redirect)> {
        let mut all: Vec<_> = self.redirects.iter().collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.len()
    }

    pub fn edit(&self, id: &MetaEditId) -> Option<&AppliedEdit> {
        self.edits.get(id)
    }

    /// Installed edits ordered by identity.
    pub fn sorted_edits(&self) -> Vec<&AppliedEdit> {
        let mut all: Vec<_> = self.edits.values().collect();
        all.sort_by_key(|e| e.edit.id());
        all
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    pub fn conflicts(&self) -> &ConflictLog {
        &self.conflicts
    }

    pub fn conflicts_mut(&mut self) -> &mut ConflictLog {
        &mut self.conflicts
    }

    /// EQP entry of `set_id` after every installed slot edit.
    pub fn merged_eqp(&self, set_id: u16, base: u64) -> u64 {
        [
            EquipSlot::Head,
            EquipSlot::Body,
            EquipSlot::Hands,
            EquipSlot::Legs,
            EquipSlot::Feet,
        ]
        .into_iter()
        .filter_map(|slot| self.edits.get(&MetaEditId::Eqp { set_id, slot }))
        .fold(base, |entry, applied| applied.edit.merge_eqp(entry))
    }

    /// EQDP entry of `set_id` for `race` after every installed slot edit.
    pub fn merged_eqdp(&self, set_id: u16, race: u16, accessory: bool, base: u16) -> u16 {
        let slots = if accessory {
            [
                EquipSlot::Ears,
                EquipSlot::Neck,
                EquipSlot::Wrists,
                EquipSlot::RFinger,
                EquipSlot::LFinger,
            ]
        } else {
            [
                EquipSlot::Head,
                EquipSlot::Body,
                EquipSlot::Hands,
                EquipSlot::Legs,
                EquipSlot::Feet,
            ]
        };
        slots
            .into_iter()
            .filter_map(|slot| self.edits.get(&MetaEditId::Eqdp { set_id, slot, race }))
            .fold(base, |entry, applied| applied.edit.merge_eqdp(entry))
    }
}

struct Claim<V> {
    owner: ModId,
    priority: i32,
    value: V,
}

/// Settles every contested key of `index`.
///
/// Claimants are ordered by priority, highest first, ties broken by mod id
/// ascending. Every pair of claimants of a key gets a record on both sides.
fn settle<K, V>(
    index: HashMap<K, Vec<Claim<V>>>,
    same_effect: impl Fn(&V, &V) -> bool,
    log: &mut BTreeMap<ModId, Vec<Conflict<K>>>,
) -> HashMap<K, (V, ModId)>
where
    K: Hash + Eq + Clone + std::fmt::Display,
{
    let mut installed = HashMap::with_capacity(index.len());

    for (key, mut claims) in index {
        if claims.len() > 1 {
            claims.sort_by(|a, b| {
                b.priority
                    .cmp(&a.priority)
                    .then_with(|| a.owner.cmp(&b.owner))
            });
            for i in 0..claims.len() {
                for j in i + 1..claims.len() {
                    let (a, b) = (&claims[i], &claims[j]);
                    let resolved = a.priority != b.priority;
                    if !resolved {
                        warn!(
                            "'{}' claimed by {} and {} at priority {}, {} ranks first by name",
                            key, a.owner, b.owner, a.priority, a.owner
                        );
                    }
                    let redundant = same_effect(&a.value, &b.value);
                    log.entry(a.owner.clone()).or_default().push(Conflict {
                        other: b.owner.clone(),
                        artifact: key.clone(),
                        resolved,
                        won: i == 0,
                        redundant,
                    });
                    log.entry(b.owner.clone()).or_default().push(Conflict {
                        other: a.owner.clone(),
                        artifact: key.clone(),
                        resolved,
                        won: false,
                        redundant,
                    });
                }
            }
        }

        let Claim { owner, value, .. } = claims.swap_remove(0);
        installed.insert(key, (value, owner));
    }

    installed
}

/// Computes the redirection table, the edit set and the conflict log.
///
/// The result depends only on the contributions, not on their order. Call
/// again after any change to mods or settings; nothing is patched in place.
pub fn resolve(contributions: Vec<ModContribution>) -> Resolution {
    let mut files: HashMap<GamePath<'static>, Vec<Claim<FullPath>>> = HashMap::new();
    let mut edits: HashMap<MetaEditId, Vec<Claim<MetaEdit>>> = HashMap::new();
    let mod_count = contributions.len();

    for c in contributions {
        for (game, full) in c.files {
            files.entry(game).or_default().push(Claim {
                owner: c.id.clone(),
                priority: c.priority,
                value: full,
            });
        }
        for edit in c.edits {
            edits.entry(edit.id()).or_default().push(Claim {
                owner: c.id.clone(),
                priority: c.priority,
                value: edit,
            });
        }
    }

    let mut file_log = BTreeMap::new();
    let mut edit_log = BTreeMap::new();

    let redirects = settle(files, |a, b| a == b, &mut file_log)
        .into_iter()
        .map(|(game, (path, owner))| (game, Redirect { path, owner }))
        .collect::<HashMap<_, _>>();
    let edits = settle(edits, MetaEdit::same_effect, &mut edit_log)
        .into_iter()
        .map(|(id, (edit, owner))| (id, AppliedEdit { edit, owner }))
        .collect::<HashMap<_, _>>();

    let conflicts = ConflictLog::from_parts(file_log, edit_log);
    debug!(
        "resolved {} mods: {} redirects, {} edits, {} file and {} edit conflict records",
        mod_count,
        redirects.len(),
        edits.len(),
        conflicts.file_count(),
        conflicts.edit_count()
    );

    Resolution {
        redirects,
        edits,
        conflicts,
    }
}
