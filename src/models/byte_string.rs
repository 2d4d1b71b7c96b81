use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Largest content length a byte string may carry.
pub const MAX_LENGTH: usize = 0x07FF_FFFF;

/// Hashes path bytes into the 32-bit key cached on every [`ByteString`].
pub fn hash32(bytes: &[u8]) -> u32 {
    let h = blake3::hash(bytes);
    let b = h.as_bytes();
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Facts about a borrowed buffer that its producer already knows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Facts {
    pub ascii: Option<bool>,
    pub lowercase: Option<bool>,
}

impl Facts {
    pub const UNKNOWN: Facts = Facts {
        ascii: None,
        lowercase: None,
    };

    pub const ASCII_LOWER: Facts = Facts {
        ascii: Some(true),
        lowercase: Some(true),
    };
}

/// Immutable byte sequence used as the key type for every path.
///
/// The content either lives in an owned buffer (which always carries a
/// trailing NUL so it can be handed to C consumers) or is borrowed from a
/// caller buffer for `'a`. Borrowed values never outlive their source; use
/// [`ByteString::into_owned`] or [`ByteString::to_owned_string`] to keep one.
///
/// Equality checks the cached hash before the bytes. Ordering is raw
/// byte order, so a strict prefix sorts first.
pub struct ByteString<'a> {
    data: Cow<'a, [u8]>,
    len: usize,
    hash: u32,
    ascii: OnceLock<bool>,
    lower: OnceLock<bool>,
}

impl<'a> ByteString<'a> {
    /// Shared empty value.
    pub const fn empty() -> ByteString<'static> {
        ByteString {
            data: Cow::Borrowed(&[0]),
            len: 0,
            // blake3 of the empty input starts with af 13 49 b9
            hash: 0xb949_13af,
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        }
    }

    /// Takes ownership of `bytes`. Fails if the content is too long.
    pub fn from_vec(mut bytes: Vec<u8>) -> Option<ByteString<'static>> {
        if bytes.len() > MAX_LENGTH {
            return None;
        }
        let len = bytes.len();
        let hash = hash32(&bytes);
        bytes.push(0);
        Some(ByteString {
            data: Cow::Owned(bytes),
            len,
            hash,
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        })
    }

    /// Encodes `text` as UTF-8, optionally lower-casing ASCII letters.
    pub fn from_text(text: &str, lower: bool) -> Option<ByteString<'static>> {
        let mut bytes = text.as_bytes().to_vec();
        if lower {
            bytes.make_ascii_lowercase();
        }
        let s = ByteString::from_vec(bytes)?;
        if lower {
            let _ = s.lower.set(true);
        }
        Some(s)
    }

    /// Borrows `bytes` without copying or scanning them.
    ///
    /// A single trailing NUL is treated as a terminator, not content.
    pub fn borrowed(bytes: &'a [u8], facts: Facts) -> Option<Self> {
        let len = match bytes.last() {
            Some(0) => bytes.len() - 1,
            _ => bytes.len(),
        };
        if len > MAX_LENGTH {
            return None;
        }
        let s = ByteString {
            data: Cow::Borrowed(bytes),
            len,
            hash: hash32(&bytes[..len]),
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        };
        s.apply(facts);
        Some(s)
    }

    /// Records facts the caller already knows about the content.
    pub fn with_facts(self, facts: Facts) -> Self {
        self.apply(facts);
        self
    }

    fn apply(&self, facts: Facts) {
        if let Some(a) = facts.ascii {
            let _ = self.ascii.set(a);
        }
        if let Some(l) = facts.lowercase {
            let _ = self.lower.set(l);
        }
    }

    fn known(&self) -> Facts {
        Facts {
            ascii: self.ascii.get().copied(),
            lowercase: self.lower.get().copied(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Content followed by its NUL terminator, if the backing store has one.
    pub fn as_c_bytes(&self) -> Option<&[u8]> {
        self.is_null_terminated().then(|| &self.data[..=self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn hash32(&self) -> u32 {
        self.hash
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }

    pub fn is_null_terminated(&self) -> bool {
        self.data.len() > self.len && self.data[self.len] == 0
    }

    pub fn is_ascii(&self) -> bool {
        *self.ascii.get_or_init(|| self.as_bytes().is_ascii())
    }

    /// True if the content holds no ASCII upper-case letters.
    pub fn is_lowercase(&self) -> bool {
        *self
            .lower
            .get_or_init(|| !self.as_bytes().iter().any(u8::is_ascii_uppercase))
    }

    pub fn known_ascii(&self) -> Option<bool> {
        self.ascii.get().copied()
    }

    pub fn known_lowercase(&self) -> Option<bool> {
        self.lower.get().copied()
    }

    /// Copies the content into an owned value.
    pub fn to_owned_string(&self) -> ByteString<'static> {
        let mut data = Vec::with_capacity(self.len + 1);
        data.extend_from_slice(self.as_bytes());
        data.push(0);
        let s = ByteString {
            data: Cow::Owned(data),
            len: self.len,
            hash: self.hash,
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        };
        s.apply(self.known());
        s
    }

    /// Converts into an owned value, reusing the buffer when already owned.
    pub fn into_owned(self) -> ByteString<'static> {
        match self.data {
            Cow::Owned(data) => ByteString {
                data: Cow::Owned(data),
                len: self.len,
                hash: self.hash,
                ascii: self.ascii,
                lower: self.lower,
            },
            Cow::Borrowed(_) => self.to_owned_string(),
        }
    }

    /// Borrowing view of `from..to`, clamped to the content.
    pub fn substring(&self, from: usize, to: usize) -> ByteString<'_> {
        let to = to.min(self.len);
        let from = from.min(to);
        let end = if to == self.len && self.is_null_terminated() {
            to + 1
        } else {
            to
        };
        let sub = ByteString {
            data: Cow::Borrowed(&self.data[from..end]),
            len: to - from,
            hash: hash32(&self.data[from..to]),
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        };
        // Facts that hold for the whole hold for every part.
        if self.known_ascii() == Some(true) {
            let _ = sub.ascii.set(true);
        }
        if self.known_lowercase() == Some(true) {
            let _ = sub.lower.set(true);
        }
        sub
    }

    /// Splits on `sep`, dropping empty segments unless `keep_empty` is set.
    ///
    /// With `max_pieces`, the last piece holds the unsplit remainder.
    pub fn split(
        &self,
        sep: u8,
        max_pieces: Option<usize>,
        keep_empty: bool,
    ) -> Vec<ByteString<'_>> {
        let mut pieces = Vec::new();
        let max = max_pieces.unwrap_or(usize::MAX);
        if max == 0 {
            return pieces;
        }
        let bytes = self.as_bytes();
        let mut start = 0;
        while start <= bytes.len() {
            if pieces.len() + 1 == max {
                if keep_empty || start < bytes.len() {
                    pieces.push(self.substring(start, bytes.len()));
                }
                break;
            }
            let end = bytes[start..]
                .iter()
                .position(|&b| b == sep)
                .map_or(bytes.len(), |p| start + p);
            if keep_empty || end > start {
                pieces.push(self.substring(start, end));
            }
            start = end + 1;
        }
        pieces
    }

    /// Concatenates `parts` with `sep` between each pair.
    ///
    /// The result is ASCII iff every part and the separator are. It is
    /// lower-case if every part is known lower-case, not lower-case if any
    /// part is known otherwise, and unknown in every other case.
    pub fn join(parts: &[ByteString<'_>], sep: u8) -> Option<ByteString<'static>> {
        let total = parts.iter().map(ByteString::len).sum::<usize>() + parts.len().saturating_sub(1);
        if total > MAX_LENGTH {
            return None;
        }
        let mut data = Vec::with_capacity(total + 1);
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                data.push(sep);
            }
            data.extend_from_slice(part.as_bytes());
        }

        let sep_used = parts.len() > 1;
        let ascii = parts.iter().all(ByteString::is_ascii) && (!sep_used || sep.is_ascii());
        let sep_lower = !sep_used || !sep.is_ascii_uppercase();
        let lower = if !sep_lower || parts.iter().any(|p| p.known_lowercase() == Some(false)) {
            Some(false)
        } else if parts.iter().all(|p| p.known_lowercase() == Some(true)) {
            Some(true)
        } else {
            None
        };

        let s = ByteString::from_vec(data)?;
        s.apply(Facts {
            ascii: Some(ascii),
            lowercase: lower,
        });
        Some(s)
    }

    /// ASCII lower-case form, borrowing when the content already is.
    pub fn to_lowercase(&self) -> ByteString<'_> {
        if self.is_lowercase() {
            let s = self.substring(0, self.len);
            let _ = s.lower.set(true);
            return s;
        }
        let mut data = self.as_bytes().to_vec();
        data.make_ascii_lowercase();
        let s = ByteString::from_owned_unchecked(data);
        let _ = s.lower.set(true);
        if let Some(a) = self.known_ascii() {
            let _ = s.ascii.set(a);
        }
        s
    }

    /// Copy with every `from` byte replaced by `to`.
    pub fn replace_byte(&self, from: u8, to: u8) -> ByteString<'static> {
        let data = self
            .as_bytes()
            .iter()
            .map(|&b| if b == from { to } else { b })
            .collect();
        ByteString::from_owned_unchecked(data)
    }

    // Content already fits because it was derived from a valid value.
    fn from_owned_unchecked(mut data: Vec<u8>) -> ByteString<'static> {
        let len = data.len();
        let hash = hash32(&data);
        data.push(0);
        ByteString {
            data: Cow::Owned(data),
            len,
            hash,
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        }
    }

    pub fn find_byte(&self, b: u8) -> Option<usize> {
        self.as_bytes().iter().position(|&x| x == b)
    }

    pub fn rfind_byte(&self, b: u8) -> Option<usize> {
        self.as_bytes().iter().rposition(|&x| x == b)
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.as_bytes().starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.as_bytes().ends_with(suffix)
    }

    /// Equality after ASCII case folding.
    pub fn eq_ignore_case(&self, other: &ByteString<'_>) -> bool {
        if self.len != other.len {
            return false;
        }
        if self.known_lowercase() == Some(true) && other.known_lowercase() == Some(true) {
            return self == other;
        }
        self.as_bytes().eq_ignore_ascii_case(other.as_bytes())
    }

    /// Ordering after ASCII case folding.
    pub fn cmp_ignore_case(&self, other: &ByteString<'_>) -> Ordering {
        self.as_bytes()
            .iter()
            .map(u8::to_ascii_lowercase)
            .cmp(other.as_bytes().iter().map(u8::to_ascii_lowercase))
    }

    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl Clone for ByteString<'_> {
    /// Cheap for borrowed values: the clone borrows the same source.
    fn clone(&self) -> Self {
        let s = ByteString {
            data: self.data.clone(),
            len: self.len,
            hash: self.hash,
            ascii: OnceLock::new(),
            lower: OnceLock::new(),
        };
        s.apply(self.known());
        s
    }
}

impl PartialEq<ByteString<'_>> for ByteString<'_> {
    fn eq(&self, other: &ByteString<'_>) -> bool {
        self.hash == other.hash && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteString<'_> {}

impl PartialOrd<ByteString<'_>> for ByteString<'_> {
    fn partial_cmp(&self, other: &ByteString<'_>) -> Option<Ordering> {
        Some(self.as_bytes().cmp(other.as_bytes()))
    }
}

impl Ord for ByteString<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for ByteString<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl fmt::Display for ByteString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl fmt::Debug for ByteString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str_lossy())
    }
}

impl Serialize for ByteString<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_str_lossy())
    }
}

impl Default for ByteString<'_> {
    fn default() -> Self {
        ByteString::empty()
    }
}
