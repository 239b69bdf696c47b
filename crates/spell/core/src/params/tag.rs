//! Binary tag tree used to persist and transmit spell parameters.
//!
//! A [`TagCompound`] is a flat, insertion-ordered record of named [`Tag`]s.
//! Nested compounds carry the two structured kinds: vectors persist as an
//! `{x, y, z}` record of doubles, unique ids as a single-field record whose
//! `value` entry holds the id split into four 32-bit words.
//!
//! With the `serde` feature the tree encodes to bytes via bincode.

use indexmap::IndexMap;
use uuid::Uuid;

#[cfg(feature = "serde")]
use super::DecodeError;

/// Key of the single entry inside a unique-id record.
pub const UUID_KEY: &str = "value";

/// A single tagged primitive (or nested record) in the binary format.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    Byte(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    IntArray(Vec<i32>),
    Compound(TagCompound),
}

impl Tag {
    /// Numeric kind identifier, stable across encodings.
    pub const fn type_id(&self) -> u8 {
        match self {
            Tag::Byte(_) => 1,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::String(_) => 8,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
        }
    }

    /// Short name of the tag kind, used in decode errors.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::String(_) => "string",
            Tag::Compound(_) => "compound",
            Tag::IntArray(_) => "int_array",
        }
    }

    /// Widens any numeric tag to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Byte(v) => Some(v as f64),
            Tag::Int(v) => Some(v as f64),
            Tag::Long(v) => Some(v as f64),
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }
}

/// Insertion-ordered record of named tags.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TagCompound {
    entries: IndexMap<String, Tag>,
}

impl TagCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, tag: Tag) {
        self.entries.insert(key.into(), tag);
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i32) {
        self.put(key, Tag::Int(value));
    }

    pub fn put_float(&mut self, key: impl Into<String>, value: f32) {
        self.put(key, Tag::Float(value));
    }

    pub fn put_double(&mut self, key: impl Into<String>, value: f64) {
        self.put(key, Tag::Double(value));
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, Tag::String(value.into()));
    }

    /// Booleans are stored as a byte (`1` / `0`).
    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.put(key, Tag::Byte(value as i8));
    }

    /// Stores a unique id as four big-endian 32-bit words.
    pub fn put_uuid(&mut self, key: impl Into<String>, value: Uuid) {
        let bits = value.as_u128();
        let words = vec![
            (bits >> 96) as u32 as i32,
            (bits >> 64) as u32 as i32,
            (bits >> 32) as u32 as i32,
            bits as u32 as i32,
        ];
        self.put(key, Tag::IntArray(words));
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Reads a numeric entry as `f64`; missing or non-numeric entries yield `None`.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Tag::as_f64)
    }

    /// True if `key` holds a four-word id array.
    pub fn has_uuid(&self, key: &str) -> bool {
        self.get_uuid(key).is_some()
    }

    pub fn get_uuid(&self, key: &str) -> Option<Uuid> {
        match self.get(key)? {
            Tag::IntArray(words) if words.len() == 4 => {
                let bits = words
                    .iter()
                    .fold(0u128, |acc, word| (acc << 32) | (*word as u32 as u128));
                Some(Uuid::from_u128(bits))
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encodes the record with bincode.
    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        bincode::serialize(self).map_err(|e| DecodeError::Encoding(e.to_string()))
    }

    /// Decodes a record previously produced by [`TagCompound::to_bytes`].
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes).map_err(|e| DecodeError::Encoding(e.to_string()))
    }
}

impl FromIterator<(String, Tag)> for TagCompound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
