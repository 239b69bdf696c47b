//! Insertion-ordered container of named parameter values.

use indexmap::IndexMap;
use serde_json::Value;
use serde_json::value::RawValue;
use uuid::Uuid;

use super::DecodeError;
use super::tag::{Tag, TagCompound, UUID_KEY};
use super::value::{ParameterType, ParameterValue, TypedValue, Vec3, json_kind, parse_canonical_uuid};

/// Parser that may claim a raw text-format string as a richer kind.
pub type StringPromotion = fn(&str) -> Option<TypedValue>;

/// Parsers tried, in order, against every string in the text format.
///
/// The first parser returning `Some` decides the stored kind. The last entry
/// always succeeds, so every string decodes to something.
pub const STRING_PROMOTIONS: [(ParameterType, StringPromotion); 2] = [
    (ParameterType::Uuid, promote_uuid),
    (ParameterType::String, promote_plain),
];

fn promote_uuid(raw: &str) -> Option<TypedValue> {
    parse_canonical_uuid(raw).map(TypedValue::Uuid)
}

fn promote_plain(raw: &str) -> Option<TypedValue> {
    Some(TypedValue::String(raw.to_owned()))
}

/// Named parameter values supplied to a parameterized cast.
///
/// Keys are unique and keep insertion order, so serialization and error
/// reporting are deterministic. Containers produced by schema validation are
/// flagged as validated; any later mutation clears the flag.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellParameters {
    values: IndexMap<String, TypedValue>,
    #[cfg_attr(feature = "serde", serde(skip))]
    validated: bool,
}

impl SpellParameters {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes the text format: a flat JSON object.
    ///
    /// Blank input yields an empty container. Number literals written with a
    /// decimal point become doubles, all others (`1e2` included) 32-bit
    /// integers; strings go through [`STRING_PROMOTIONS`]; 3-element numeric
    /// arrays become vectors.
    pub fn from_text(text: &str) -> Result<Self, DecodeError> {
        if text.trim().is_empty() {
            return Ok(Self::empty());
        }

        let fields: IndexMap<String, Box<RawValue>> = match serde_json::from_str(text) {
            Ok(fields) => fields,
            Err(error) => {
                return Err(match serde_json::from_str::<Value>(text) {
                    Ok(root) => DecodeError::NotAnObject {
                        found: json_kind(&root),
                    },
                    Err(_) => DecodeError::Syntax(error.to_string()),
                });
            }
        };

        let mut values = IndexMap::with_capacity(fields.len());
        for (key, raw) in fields {
            let value: Value = serde_json::from_str(raw.get())
                .map_err(|e| DecodeError::Syntax(e.to_string()))?;
            let decoded = decode_text_value(&key, &value, raw.get())?;
            values.insert(key, decoded);
        }
        Ok(Self {
            values,
            validated: false,
        })
    }

    /// Decodes the binary tag format.
    ///
    /// Nested records holding `x`, `y` and `z` become vectors, records holding
    /// a single id entry become ids, anything else is kept as an opaque record.
    /// Selectors and dimensions are stored as plain strings and decode as
    /// [`TypedValue::String`]; validating against the spell's schema turns
    /// them back into their declared kind.
    pub fn from_binary(tag: &TagCompound) -> Result<Self, DecodeError> {
        let mut values = IndexMap::with_capacity(tag.len());
        for (key, entry) in tag.iter() {
            let decoded = match entry {
                Tag::Int(v) => TypedValue::Int(*v),
                Tag::Float(v) => TypedValue::Float(*v),
                Tag::Double(v) => TypedValue::Double(*v),
                Tag::String(s) => TypedValue::String(s.clone()),
                Tag::Byte(b) => TypedValue::Boolean(*b != 0),
                Tag::Compound(nested) => decode_nested(nested),
                Tag::Long(_) | Tag::IntArray(_) => {
                    return Err(DecodeError::UnsupportedTag {
                        key: key.to_owned(),
                        kind: entry.kind_name(),
                    });
                }
            };
            values.insert(key.to_owned(), decoded);
        }
        Ok(Self {
            values,
            validated: false,
        })
    }

    /// Decodes bytes produced by [`SpellParameters::to_bytes`].
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_binary(&TagCompound::from_bytes(bytes)?)
    }

    /// Wraps schema output without re-validating it.
    pub fn from_validated_map(values: IndexMap<String, TypedValue>) -> Self {
        Self {
            values,
            validated: true,
        }
    }

    /// True if this container came out of schema validation unmodified.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Inserts or replaces an entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Option<TypedValue> {
        self.validated = false;
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style [`SpellParameters::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&TypedValue> {
        self.values.get(key)
    }

    /// Typed lookup; `None` when absent or not convertible to `T`.
    pub fn try_get<T: ParameterValue>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(T::from_value)
    }

    /// Typed lookup falling back to `default`.
    pub fn get<T: ParameterValue>(&self, key: &str, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key, default)
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.get(key, default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key, default)
    }

    pub fn get_vec3(&self, key: &str) -> Option<Vec3> {
        self.try_get(key)
    }

    pub fn get_uuid(&self, key: &str) -> Option<Uuid> {
        self.try_get(key)
    }

    /// Converts to the binary tag format. Opaque nested records are omitted.
    pub fn to_binary(&self) -> TagCompound {
        self.values
            .iter()
            .filter_map(|(key, value)| value.to_tag().map(|tag| (key.clone(), tag)))
            .collect()
    }

    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        self.to_binary().to_bytes()
    }

    /// Read-only view of the underlying mapping.
    pub fn as_map(&self) -> &IndexMap<String, TypedValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, TypedValue)> for SpellParameters {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            validated: false,
        }
    }
}

/// `literal` is the value as written; it decides between integer and double.
fn decode_text_value(key: &str, value: &Value, literal: &str) -> Result<TypedValue, DecodeError> {
    match value {
        Value::Number(n) if literal.contains('.') => {
            Ok(TypedValue::Double(n.as_f64().unwrap_or_default()))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|v| (i32::MIN as f64..=i32::MAX as f64).contains(v))
                    .map(|v| v as i32)
            })
            .map(TypedValue::Int)
            .ok_or_else(|| DecodeError::IntegerOutOfRange {
                key: key.to_owned(),
                literal: literal.to_owned(),
            }),
        Value::Bool(b) => Ok(TypedValue::Boolean(*b)),
        Value::String(raw) => Ok(STRING_PROMOTIONS
            .iter()
            .find_map(|(_, promote)| promote(raw))
            .unwrap_or_else(|| TypedValue::String(raw.clone()))),
        Value::Array(_) => ParameterType::Vec3.decode_text(key, value),
        Value::Null | Value::Object(_) => Err(DecodeError::field(
            key,
            "number, boolean, string or 3-element array",
            json_kind(value),
        )),
    }
}

fn decode_nested(nested: &TagCompound) -> TypedValue {
    if nested.contains("x") && nested.contains("y") && nested.contains("z") {
        if let Some(v) = Vec3::from_compound(nested) {
            return TypedValue::Vec3(v);
        }
    }
    if nested.len() == 1 {
        if let Some(id) = nested.get_uuid(UUID_KEY) {
            return TypedValue::Uuid(id);
        }
    }
    TypedValue::Compound(nested.clone())
}
