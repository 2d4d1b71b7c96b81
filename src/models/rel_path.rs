use crate::models::byte_string::{ByteString, Facts};
use crate::models::game_path::{self, GamePath};
use camino::{Utf8Component, Utf8Path};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

pub const MAX_REL_PATH_LENGTH: usize = 250;

/// A file inside a mod, relative to the mod root, `\`-separated.
///
/// Case is preserved so the path can be joined back onto a real directory.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RelPath<'a>(ByteString<'a>);

pub static EMPTY: RelPath<'static> = RelPath(ByteString::empty());

impl<'a> RelPath<'a> {
    pub fn empty() -> &'static RelPath<'static> {
        &EMPTY
    }

    /// Parses `text`, turning `/` into `\`.
    ///
    /// The result must stay inside the mod root: rooted paths, drive
    /// prefixes and `.` or `..` segments are rejected.
    pub fn from_text(text: &str) -> Option<RelPath<'static>> {
        if text.len() > MAX_REL_PATH_LENGTH || !text.is_ascii() || escapes_root(text.as_bytes()) {
            return None;
        }
        let s = ByteString::from_vec(text.as_bytes().to_vec())?;
        RelPath::from_byte_string(s.replace_byte(b'/', b'\\'))
    }

    pub fn from_byte_string(s: ByteString<'a>) -> Option<RelPath<'a>> {
        if s.len() > MAX_REL_PATH_LENGTH || !s.is_ascii() {
            return None;
        }
        Some(RelPath(s))
    }

    /// Path of `file` below `base`. Fails if `file` is not inside `base`.
    pub fn from_file(file: &Utf8Path, base: &Utf8Path) -> Option<RelPath<'static>> {
        let rel = file.strip_prefix(base).ok()?;
        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Utf8Component::Normal(part) => parts.push(part),
                Utf8Component::CurDir => {}
                _ => return None,
            }
        }
        if parts.is_empty() {
            return None;
        }
        RelPath::from_text(&parts.join("\\"))
    }

    pub fn as_byte_string(&self) -> &ByteString<'a> {
        &self.0
    }

    pub fn into_owned(self) -> RelPath<'static> {
        RelPath(self.0.into_owned())
    }

    pub fn to_owned_path(&self) -> RelPath<'static> {
        RelPath(self.0.to_owned_string())
    }

    /// Virtual path for this file.
    ///
    /// `skip_folders` leading segments are dropped first, which strips
    /// scaffolding folders a mod keeps above its archive layout.
    pub fn to_game_path(&self, skip_folders: usize, lower: bool) -> Option<GamePath<'static>> {
        let mut rest = self.0.as_bytes();
        for _ in 0..skip_folders {
            let idx = rest.iter().position(|&b| b == b'\\')?;
            rest = &rest[idx + 1..];
        }
        let mut bytes: Vec<u8> = rest
            .iter()
            .map(|&b| if b == b'\\' { b'/' } else { b })
            .collect();
        if lower {
            bytes.make_ascii_lowercase();
        }
        let facts = Facts {
            ascii: Some(true),
            lowercase: lower.then_some(true),
        };
        let s = ByteString::from_vec(bytes)?.with_facts(facts);
        GamePath::from_byte_string(s)
    }

    pub fn filename(&self) -> RelPath<'_> {
        let start = self.0.rfind_byte(b'\\').map_or(0, |i| i + 1);
        RelPath(self.0.substring(start, self.0.len()))
    }

    pub fn extension(&self) -> RelPath<'_> {
        let start = self.0.rfind_byte(b'\\').map_or(0, |i| i + 1);
        match self.0.as_bytes()[start..].iter().rposition(|&b| b == b'.') {
            Some(i) => RelPath(self.0.substring(start + i, self.0.len())),
            None => RelPath(ByteString::empty()),
        }
    }

    pub fn is_rooted(&self) -> bool {
        game_path::is_rooted(self.0.as_bytes())
    }

    /// Segments between `\` separators, empty ones dropped.
    pub fn segments(&self) -> Vec<ByteString<'_>> {
        self.0.split(b'\\', None, false)
    }
}

fn escapes_root(bytes: &[u8]) -> bool {
    game_path::is_rooted(bytes)
        || bytes.contains(&b':')
        || bytes
            .split(|&b| b == b'\\' || b == b'/')
            .any(|segment| segment == b"." || segment == b"..")
}

impl<'a> Deref for RelPath<'a> {
    type Target = ByteString<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for RelPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for RelPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Serialize for RelPath<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
