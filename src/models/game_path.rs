use crate::models::byte_string::{ByteString, Facts};
use crate::models::rel_path::RelPath;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

pub const MAX_GAME_PATH_LENGTH: usize = 256;

/// Archive-side asset identifier: ASCII, `/`-separated, at most 256 bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GamePath<'a>(ByteString<'a>);

pub static EMPTY: GamePath<'static> = GamePath(ByteString::empty());

impl<'a> GamePath<'a> {
    pub fn empty() -> &'static GamePath<'static> {
        &EMPTY
    }

    /// Parses `text`, turning `\` into `/` and optionally lower-casing.
    pub fn from_text(text: &str, lower: bool) -> Option<GamePath<'static>> {
        if text.len() > MAX_GAME_PATH_LENGTH || !text.is_ascii() {
            return None;
        }
        let mut bytes = text.as_bytes().to_vec();
        for b in bytes.iter_mut() {
            if *b == b'\\' {
                *b = b'/';
            }
        }
        if lower {
            bytes.make_ascii_lowercase();
        }
        let s = ByteString::from_vec(bytes)?;
        Some(GamePath(Self::tag(s, lower)))
    }

    /// Borrows a caller buffer, e.g. a path handed over by the hook layer.
    pub fn from_bytes(bytes: &'a [u8]) -> Option<GamePath<'a>> {
        let s = ByteString::borrowed(bytes, Facts::UNKNOWN)?;
        Self::from_byte_string(s)
    }

    /// Validates an existing byte string without copying it.
    pub fn from_byte_string(s: ByteString<'a>) -> Option<GamePath<'a>> {
        if s.len() > MAX_GAME_PATH_LENGTH || !s.is_ascii() {
            return None;
        }
        Some(GamePath(s))
    }

    fn tag<'b>(s: ByteString<'b>, lower: bool) -> ByteString<'b> {
        let facts = Facts {
            ascii: Some(true),
            lowercase: lower.then_some(true),
        };
        s.with_facts(facts)
    }

    pub fn as_byte_string(&self) -> &ByteString<'a> {
        &self.0
    }

    pub fn into_owned(self) -> GamePath<'static> {
        GamePath(self.0.into_owned())
    }

    pub fn to_owned_path(&self) -> GamePath<'static> {
        GamePath(self.0.to_owned_string())
    }

    pub fn to_lowercase(&self) -> GamePath<'_> {
        GamePath(self.0.to_lowercase())
    }

    /// Everything after the last `/`.
    pub fn filename(&self) -> GamePath<'_> {
        let start = self.0.rfind_byte(b'/').map_or(0, |i| i + 1);
        GamePath(self.0.substring(start, self.0.len()))
    }

    /// Extension of the file name including the leading dot.
    pub fn extension(&self) -> GamePath<'_> {
        let name = self.filename();
        match name.0.rfind_byte(b'.') {
            Some(i) => {
                let start = self.0.len() - name.0.len() + i;
                GamePath(self.0.substring(start, self.0.len()))
            }
            None => GamePath(ByteString::empty()),
        }
    }

    /// True for `/x`, `\x` and drive-letter paths like `C:`.
    pub fn is_rooted(&self) -> bool {
        is_rooted(self.0.as_bytes())
    }

    /// Same path with `\` separators. Fails if it does not fit a relative path.
    pub fn to_rel_path(&self) -> Option<RelPath<'static>> {
        RelPath::from_byte_string(self.0.replace_byte(b'/', b'\\'))
    }
}

pub(crate) fn is_rooted(bytes: &[u8]) -> bool {
    match bytes {
        [b'/' | b'\\', ..] => true,
        [drive, b':', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

impl<'a> Deref for GamePath<'a> {
    type Target = ByteString<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for GamePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for GamePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Serialize for GamePath<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_validates() {
        assert!(GamePath::from_text("chara/a.tex", false).is_some());
        assert!(GamePath::from_text("chära/a.tex", false).is_none());
        assert!(GamePath::from_text(&"a".repeat(256), false).is_some());
        assert!(GamePath::from_text(&"a".repeat(257), false).is_none());
    }

    #[test]
    fn test_from_text_normalizes() {
        let p = GamePath::from_text("Chara\\Equipment\\A.tex", true).unwrap();
        assert_eq!(p.as_bytes(), b"chara/equipment/a.tex");
        assert_eq!(p.known_lowercase(), Some(true));
        assert_eq!(p.known_ascii(), Some(true));
    }

    #[test]
    fn test_from_bytes_borrows() {
        let buf = b"chara/a.tex\0".to_vec();
        let p = GamePath::from_bytes(&buf).unwrap();
        assert!(!p.is_owned());
        assert_eq!(p, GamePath::from_text("chara/a.tex", false).unwrap());
        assert!(GamePath::from_bytes(&[0xC3, 0xA4]).is_none());
    }

    #[test]
    fn test_filename_and_extension() {
        let p = GamePath::from_text("chara/equipment/e0001/a.tex", false).unwrap();
        assert_eq!(p.filename().as_bytes(), b"a.tex");
        assert_eq!(p.extension().as_bytes(), b".tex");
        let bare = GamePath::from_text("chara/readme", false).unwrap();
        assert!(bare.extension().is_empty());
        let dotted_dir = GamePath::from_text("a.b/c", false).unwrap();
        assert!(dotted_dir.extension().is_empty());
    }

    #[test]
    fn test_rooted() {
        assert!(GamePath::from_text("/chara", false).unwrap().is_rooted());
        assert!(GamePath::from_text("C:/chara", false).unwrap().is_rooted());
        assert!(!GamePath::from_text("chara/a.tex", false).unwrap().is_rooted());
        assert!(!GamePath::empty().is_rooted());
    }

    #[test]
    fn test_to_rel_path_length_limit() {
        let short = GamePath::from_text("chara/a.tex", false).unwrap();
        assert_eq!(short.to_rel_path().unwrap().as_bytes(), b"chara\\a.tex");
        let long = GamePath::from_text(&"a".repeat(255), false).unwrap();
        assert!(long.to_rel_path().is_none());
    }
}
