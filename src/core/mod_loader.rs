use crate::models::byte_string::ByteString;
use crate::models::error::ModError;
use crate::models::game_path::GamePath;
use crate::models::mod_def::{FileMap, ModDef, ModOption, OptionGroup};
use crate::models::mod_dto::{DefaultOptionDto, FileMapDto, GroupDto, ModManifest};
use crate::models::paths::{ModLayout, GROUP_FILE_PREFIX};
use crate::models::rel_path::RelPath;
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Reads mod directories into [`ModDef`]s.
pub struct ModLoader;

impl ModLoader {
    fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ModError> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| ModError::Parse(format!("{path}: {e}")))
    }

    /// Same as [`Self::read_json`], but a missing file yields the default.
    fn read_json_or_default<T: DeserializeOwned + Default>(path: &Utf8Path) -> Result<T, ModError> {
        if path.is_file() {
            Self::read_json(path)
        } else {
            Ok(T::default())
        }
    }

    pub fn read_manifest(root: &Utf8Path) -> Result<ModManifest, ModError> {
        Self::read_json_or_default(&ModLayout::new(root).meta)
    }

    fn file_map(owner: &str, dto: FileMapDto) -> FileMap {
        let mut map = FileMap::new();
        for (rel_text, targets) in dto {
            let Some(rel) = RelPath::from_text(&rel_text) else {
                warn!("{owner}: skipping invalid relative path '{rel_text}'");
                continue;
            };
            let games: BTreeSet<_> = targets
                .iter()
                .filter_map(|target| {
                    let game = GamePath::from_text(target, true);
                    if game.is_none() {
                        warn!("{owner}: skipping invalid game path '{target}' for '{rel_text}'");
                    }
                    game
                })
                .collect();
            if games.is_empty() {
                warn!("{owner}: '{rel_text}' has no valid targets");
                continue;
            }
            map.entry(rel).or_default().extend(games);
        }
        map
    }

    /// Group documents directly in `root`, ordered by file name.
    fn group_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ModError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                continue;
            };
            let is_group = path
                .file_name()
                .is_some_and(|n| n.starts_with(GROUP_FILE_PREFIX) && n.ends_with(".json"));
            if is_group && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_group(id: &str, path: &Utf8Path) -> Result<OptionGroup, ModError> {
        let dto: GroupDto = Self::read_json(path)?;
        let owner = format!("{id}/{}", dto.name);
        let mut group = OptionGroup::new(dto.name, dto.group_type);
        group.description = dto.description;
        for option in dto.options {
            group.options.push(ModOption {
                files: Self::file_map(&owner, option.files),
                name: option.name,
                description: option.description,
                edits: option.edits,
            });
        }
        Ok(group)
    }

    /// Content files below `root`, skipping the definition documents at its top.
    pub fn collect_files(root: &Utf8Path) -> BTreeSet<RelPath<'static>> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let path = Utf8PathBuf::from_path_buf(e.path().to_path_buf()).ok()?;
                if e.depth() == 1 && path.file_name().is_some_and(ModLayout::is_definition_file) {
                    return None;
                }
                let rel = RelPath::from_file(&path, root);
                if rel.is_none() {
                    warn!("skipping file with unusable path {path}");
                }
                rel
            })
            .collect()
    }

    /// Rewrites the keys of `map` to the spelling the file has on disk, so a
    /// definition written as `variant\body.tex` serves `Variant/Body.tex`.
    fn match_disk_spelling(
        map: FileMap,
        on_disk: &BTreeMap<ByteString<'static>, RelPath<'static>>,
    ) -> FileMap {
        let mut matched = FileMap::new();
        for (rel, games) in map {
            let folded = rel.to_lowercase().into_owned();
            let rel = match on_disk.get(&folded) {
                Some(disk) => disk.clone(),
                None => rel,
            };
            matched.entry(rel).or_default().extend(games);
        }
        matched
    }

    /// Loads the mod stored in `root`; its id is the directory name.
    pub fn load(root: &Utf8Path) -> Result<ModDef, ModError> {
        if !root.is_dir() {
            return Err(ModError::ModNotFound(root.to_string()));
        }
        let id = root
            .file_name()
            .ok_or_else(|| ModError::InvalidPath(root.to_string()))?;

        let layout = ModLayout::new(root);
        let manifest = Self::read_manifest(root)?;
        let default: DefaultOptionDto = Self::read_json_or_default(&layout.default_option)?;

        let mut def = ModDef::new(id, root);
        if !manifest.name.is_empty() {
            def.name = manifest.name;
        }
        def.author = manifest.author;
        def.version = manifest.version;
        def.description = manifest.description;
        def.default_files = Self::file_map(id, default.files);
        def.default_edits = default.edits;

        for path in Self::group_files(root)? {
            def.add_group(Self::read_group(id, &path)?)?;
        }
        def.files = Self::collect_files(root);

        let on_disk: BTreeMap<_, _> = def
            .files
            .iter()
            .map(|rel| (rel.to_lowercase().into_owned(), rel.clone()))
            .collect();
        let default_files = std::mem::take(&mut def.default_files);
        def.default_files = Self::match_disk_spelling(default_files, &on_disk);
        for option in def.groups.iter_mut().flat_map(|g| g.options.iter_mut()) {
            let files = std::mem::take(&mut option.files);
            option.files = Self::match_disk_spelling(files, &on_disk);
        }

        debug!(
            "loaded mod {}: {} groups, {} files",
            def.id,
            def.groups.len(),
            def.files.len()
        );
        Ok(def)
    }

    /// Loads every mod directory in `mods_dir`. Mods that fail to load are
    /// logged and left out.
    pub fn discover(mods_dir: &Utf8Path) -> Result<Vec<ModDef>, ModError> {
        if !mods_dir.exists() {
            return Ok(Vec::new());
        }
        let mut roots = Vec::new();
        for entry in std::fs::read_dir(mods_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(path) => roots.push(path),
                Err(path) => warn!("skipping mod directory with non UTF-8 name {}", path.display()),
            }
        }
        roots.sort();

        Ok(roots
            .iter()
            .filter_map(|root| match Self::load(root) {
                Ok(def) => Some(def),
                Err(e) => {
                    warn!("failed to load mod at {root}: {e}");
                    None
                }
            })
            .collect())
    }
}
