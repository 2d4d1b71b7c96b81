use crate::models::byte_string::{ByteString, Facts};
use crate::models::game_path::{self, GamePath};
use crate::models::rel_path::RelPath;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Hashes a lower-cased internal name into the 64-bit identity key.
pub fn hash64(bytes: &[u8]) -> u64 {
    let h = blake3::hash(bytes);
    let b = h.as_bytes();
    u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// A file on disk that ends up served for some game path.
///
/// `internal_name` is the `/`-separated, lower-cased spelling of the path and
/// `hash64` its identity key, so two spellings of one file compare equal.
#[derive(Clone, Default)]
pub struct FullPath {
    full: Utf8PathBuf,
    internal_name: ByteString<'static>,
    hash64: u64,
}

impl FullPath {
    pub fn empty() -> &'static FullPath {
        static EMPTY: OnceLock<FullPath> = OnceLock::new();
        EMPTY.get_or_init(FullPath::default)
    }

    pub fn new(path: impl Into<Utf8PathBuf>) -> Option<FullPath> {
        let full = path.into();
        if full.as_str().is_empty() {
            return Some(FullPath::default());
        }
        let mut bytes = full.as_str().as_bytes().to_vec();
        for b in bytes.iter_mut() {
            if *b == b'\\' {
                *b = b'/';
            } else {
                b.make_ascii_lowercase();
            }
        }
        let internal_name = ByteString::from_vec(bytes)?.with_facts(Facts {
            ascii: None,
            lowercase: Some(true),
        });
        let hash64 = hash64(internal_name.as_bytes());
        Some(FullPath {
            full,
            internal_name,
            hash64,
        })
    }

    /// `base` joined with every segment of `rel`. Fails if the result would
    /// not lie below `base`.
    pub fn from_rel(base: &Utf8Path, rel: &RelPath<'_>) -> Option<FullPath> {
        let mut full = base.to_path_buf();
        for segment in rel.segments() {
            let segment = segment.to_str_lossy();
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains(':') {
                return None;
            }
            full.push(&*segment);
        }
        let below = full
            .strip_prefix(base)
            .ok()?
            .components()
            .all(|c| matches!(c, Utf8Component::Normal(_)));
        if !below {
            return None;
        }
        FullPath::new(full)
    }

    pub fn as_path(&self) -> &Utf8Path {
        &self.full
    }

    pub fn internal_name(&self) -> &ByteString<'static> {
        &self.internal_name
    }

    pub fn hash64(&self) -> u64 {
        self.hash64
    }

    pub fn is_empty(&self) -> bool {
        self.full.as_str().is_empty()
    }

    pub fn is_rooted(&self) -> bool {
        game_path::is_rooted(self.full.as_str().as_bytes())
    }

    pub fn extension(&self) -> Option<&str> {
        self.full.extension()
    }

    /// Location below `base`. Fails if this path is not inside `base`.
    pub fn to_rel_path(&self, base: &Utf8Path) -> Option<RelPath<'static>> {
        RelPath::from_file(&self.full, base)
    }

    /// Game path spelled like the location below `base`.
    pub fn to_game_path(&self, base: &Utf8Path, lower: bool) -> Option<GamePath<'static>> {
        self.to_rel_path(base)?.to_game_path(0, lower)
    }
}

impl PartialEq for FullPath {
    fn eq(&self, other: &Self) -> bool {
        if self.hash64 != other.hash64 {
            return false;
        }
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        self.internal_name == other.internal_name
    }
}

impl Eq for FullPath {}

impl Hash for FullPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash64);
    }
}

impl fmt::Display for FullPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full.as_str())
    }
}

impl fmt::Debug for FullPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FullPath({:?})", self.full)
    }
}

impl Serialize for FullPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.full.as_str())
    }
}
