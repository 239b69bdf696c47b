//! Parameter kinds and the dynamically-typed values they accept.
//!
//! [`ParameterType`] is the closed set of kinds a schema field can declare.
//! Each kind knows how to decode itself from the text format (a JSON value)
//! and from the binary tag format, whether an arbitrary [`TypedValue`] is
//! acceptable for it, and how to narrow an accepted value to its canonical
//! runtime representation.

use core::fmt;

use serde_json::Value;
use uuid::Uuid;

use super::DecodeError;
use super::tag::{Tag, TagCompound, UUID_KEY};

/// Length of the canonical hyphenated textual id.
pub const CANONICAL_UUID_LEN: usize = 36;

/// Three-component position / direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Reads an `{x, y, z}` record. Every component must be numeric.
    pub fn from_compound(tag: &TagCompound) -> Option<Self> {
        Some(Self::new(
            tag.get_f64("x")?,
            tag.get_f64("y")?,
            tag.get_f64("z")?,
        ))
    }

    pub fn to_compound(&self) -> TagCompound {
        let mut tag = TagCompound::new();
        tag.put_double("x", self.x);
        tag.put_double("y", self.y);
        tag.put_double("z", self.z);
        tag
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Parses the canonical 36-character hyphenated form only.
pub fn parse_canonical_uuid(raw: &str) -> Option<Uuid> {
    if raw.len() != CANONICAL_UUID_LEN {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

/// Closed set of value kinds a schema field may declare.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParameterType {
    Int,
    Float,
    Double,
    String,
    Boolean,
    Vec3,
    Uuid,
    EntitySelector,
    Dimension,
}

impl ParameterType {
    /// Human-readable name used in error messages and usage text.
    pub const fn display_name(&self) -> &'static str {
        match self {
            ParameterType::Int => "integer",
            ParameterType::Float => "float",
            ParameterType::Double => "double",
            ParameterType::String => "string",
            ParameterType::Boolean => "boolean",
            ParameterType::Vec3 => "3D vector",
            ParameterType::Uuid => "entity UUID",
            ParameterType::EntitySelector => "entity selector",
            ParameterType::Dimension => "dimension",
        }
    }

    /// Decodes a text-format value as this kind.
    pub fn decode_text(&self, key: &str, value: &Value) -> Result<TypedValue, DecodeError> {
        let mismatch = || DecodeError::field(key, self.display_name(), json_kind(value));

        match self {
            ParameterType::Int => {
                let n = value.as_f64().ok_or_else(mismatch)?;
                Ok(TypedValue::Int(n as i32))
            }
            ParameterType::Float => {
                let n = value.as_f64().ok_or_else(mismatch)?;
                Ok(TypedValue::Float(n as f32))
            }
            ParameterType::Double => value.as_f64().map(TypedValue::Double).ok_or_else(mismatch),
            ParameterType::Boolean => value.as_bool().map(TypedValue::Boolean).ok_or_else(mismatch),
            ParameterType::String => value
                .as_str()
                .map(|s| TypedValue::String(s.to_owned()))
                .ok_or_else(mismatch),
            ParameterType::Vec3 => decode_vec3_array(key, value),
            ParameterType::Uuid => value
                .as_str()
                .and_then(parse_canonical_uuid)
                .map(TypedValue::Uuid)
                .ok_or_else(mismatch),
            ParameterType::EntitySelector => value
                .as_str()
                .map(|s| TypedValue::EntitySelector(s.to_owned()))
                .ok_or_else(mismatch),
            ParameterType::Dimension => value
                .as_str()
                .map(|s| TypedValue::Dimension(s.to_owned()))
                .ok_or_else(mismatch),
        }
    }

    /// Decodes a binary-format tag as this kind.
    pub fn decode_binary(&self, key: &str, tag: &Tag) -> Result<TypedValue, DecodeError> {
        let mismatch = || DecodeError::field(key, self.display_name(), tag.kind_name());

        match (self, tag) {
            (ParameterType::Int, tag) => tag.as_f64().map(|n| TypedValue::Int(n as i32)),
            (ParameterType::Float, tag) => tag.as_f64().map(|n| TypedValue::Float(n as f32)),
            (ParameterType::Double, tag) => tag.as_f64().map(TypedValue::Double),
            (ParameterType::Boolean, Tag::Byte(b)) => Some(TypedValue::Boolean(*b != 0)),
            (ParameterType::String, Tag::String(s)) => Some(TypedValue::String(s.clone())),
            (ParameterType::Vec3, Tag::Compound(nested)) => {
                Vec3::from_compound(nested).map(TypedValue::Vec3)
            }
            (ParameterType::Uuid, Tag::Compound(nested)) => {
                nested.get_uuid(UUID_KEY).map(TypedValue::Uuid)
            }
            (ParameterType::EntitySelector, Tag::String(s)) => {
                Some(TypedValue::EntitySelector(s.clone()))
            }
            (ParameterType::Dimension, Tag::String(s)) => Some(TypedValue::Dimension(s.clone())),
            _ => None,
        }
        .ok_or_else(mismatch)
    }

    /// Whether `value` is acceptable input for a field of this kind.
    ///
    /// Numeric kinds accept any number; booleans also accept numbers (nonzero
    /// is true); ids accept either a typed id or a string that parses as one.
    pub fn is_valid(&self, value: &TypedValue) -> bool {
        match self {
            ParameterType::Int | ParameterType::Float | ParameterType::Double => {
                value.is_numeric()
            }
            ParameterType::Boolean => matches!(value, TypedValue::Boolean(_)) || value.is_numeric(),
            ParameterType::Vec3 => matches!(value, TypedValue::Vec3(_)),
            ParameterType::Uuid => match value {
                TypedValue::Uuid(_) => true,
                TypedValue::String(s) => parse_canonical_uuid(s).is_some(),
                _ => false,
            },
            ParameterType::String | ParameterType::EntitySelector | ParameterType::Dimension => {
                true
            }
        }
    }

    /// Narrows an accepted value to this kind's canonical representation.
    ///
    /// Returns `None` only when `value` fails [`ParameterType::is_valid`].
    pub fn normalize(&self, value: &TypedValue) -> Option<TypedValue> {
        match self {
            ParameterType::Int => i32::from_value(value).map(TypedValue::Int),
            ParameterType::Float => f32::from_value(value).map(TypedValue::Float),
            ParameterType::Double => f64::from_value(value).map(TypedValue::Double),
            ParameterType::Boolean => match value {
                TypedValue::Boolean(b) => Some(TypedValue::Boolean(*b)),
                other => other.as_f64().map(|n| TypedValue::Boolean(n as i32 != 0)),
            },
            ParameterType::Vec3 => match value {
                TypedValue::Vec3(v) => Some(TypedValue::Vec3(*v)),
                _ => None,
            },
            ParameterType::Uuid => Uuid::from_value(value).map(TypedValue::Uuid),
            ParameterType::String => Some(TypedValue::String(value.to_string())),
            ParameterType::EntitySelector => Some(TypedValue::EntitySelector(value.to_string())),
            ParameterType::Dimension => Some(TypedValue::Dimension(value.to_string())),
        }
    }
}

fn decode_vec3_array(key: &str, value: &Value) -> Result<TypedValue, DecodeError> {
    let expected = ParameterType::Vec3.display_name();
    let items = value
        .as_array()
        .filter(|items| items.len() == 3)
        .ok_or_else(|| DecodeError::field(key, expected, json_kind(value)))?;

    let mut components = [0.0f64; 3];
    for (slot, item) in components.iter_mut().zip(items) {
        *slot = item
            .as_f64()
            .ok_or_else(|| DecodeError::field(key, expected, "non-numeric component"))?;
    }
    let [x, y, z] = components;
    Ok(TypedValue::Vec3(Vec3::new(x, y, z)))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A dynamically-typed parameter value.
///
/// Values are immutable once stored in a [`super::SpellParameters`];
/// replacing a value replaces the container entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypedValue {
    Int(i32),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Vec3(Vec3),
    Uuid(Uuid),
    EntitySelector(String),
    Dimension(String),
    /// Opaque nested record carried through from the binary format.
    Compound(TagCompound),
}

impl TypedValue {
    /// The kind this value is tagged with; opaque records have none.
    pub const fn kind(&self) -> Option<ParameterType> {
        match self {
            TypedValue::Int(_) => Some(ParameterType::Int),
            TypedValue::Float(_) => Some(ParameterType::Float),
            TypedValue::Double(_) => Some(ParameterType::Double),
            TypedValue::Boolean(_) => Some(ParameterType::Boolean),
            TypedValue::String(_) => Some(ParameterType::String),
            TypedValue::Vec3(_) => Some(ParameterType::Vec3),
            TypedValue::Uuid(_) => Some(ParameterType::Uuid),
            TypedValue::EntitySelector(_) => Some(ParameterType::EntitySelector),
            TypedValue::Dimension(_) => Some(ParameterType::Dimension),
            TypedValue::Compound(_) => None,
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypedValue::Int(_) | TypedValue::Float(_) | TypedValue::Double(_)
        )
    }

    /// Widens numeric values to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            TypedValue::Int(v) => Some(v as f64),
            TypedValue::Float(v) => Some(v as f64),
            TypedValue::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to the binary representation. Opaque records are not
    /// persisted and yield `None`. Selectors and dimensions lose their kind
    /// here and come back as plain strings.
    pub fn to_tag(&self) -> Option<Tag> {
        match self {
            TypedValue::Int(v) => Some(Tag::Int(*v)),
            TypedValue::Float(v) => Some(Tag::Float(*v)),
            TypedValue::Double(v) => Some(Tag::Double(*v)),
            TypedValue::Boolean(v) => Some(Tag::Byte(*v as i8)),
            TypedValue::String(s) | TypedValue::EntitySelector(s) | TypedValue::Dimension(s) => {
                Some(Tag::String(s.clone()))
            }
            TypedValue::Vec3(v) => Some(Tag::Compound(v.to_compound())),
            TypedValue::Uuid(id) => {
                let mut nested = TagCompound::new();
                nested.put_uuid(UUID_KEY, *id);
                Some(Tag::Compound(nested))
            }
            TypedValue::Compound(_) => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(v) => write!(f, "{v}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Double(v) => write!(f, "{v}"),
            TypedValue::Boolean(v) => write!(f, "{v}"),
            TypedValue::String(s) | TypedValue::EntitySelector(s) | TypedValue::Dimension(s) => {
                f.write_str(s)
            }
            TypedValue::Vec3(v) => write!(f, "{v}"),
            TypedValue::Uuid(id) => write!(f, "{}", id.hyphenated()),
            TypedValue::Compound(tag) => {
                f.write_str("{")?;
                for (i, key) in tag.keys().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(key)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        TypedValue::Int(v)
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        TypedValue::Float(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Double(v)
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        TypedValue::Boolean(v)
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::String(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::String(v.to_owned())
    }
}

impl From<Vec3> for TypedValue {
    fn from(v: Vec3) -> Self {
        TypedValue::Vec3(v)
    }
}

impl From<Uuid> for TypedValue {
    fn from(v: Uuid) -> Self {
        TypedValue::Uuid(v)
    }
}

/// Typed extraction used by [`super::SpellParameters::get`].
pub trait ParameterValue: Sized {
    fn from_value(value: &TypedValue) -> Option<Self>;
}

impl ParameterValue for i32 {
    fn from_value(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::Int(v) => Some(*v),
            other => other.as_f64().map(|n| n as i32),
        }
    }
}

impl ParameterValue for f32 {
    fn from_value(value: &TypedValue) -> Option<Self> {
        value.as_f64().map(|n| n as f32)
    }
}

impl ParameterValue for f64 {
    fn from_value(value: &TypedValue) -> Option<Self> {
        value.as_f64()
    }
}

impl ParameterValue for bool {
    fn from_value(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl ParameterValue for String {
    fn from_value(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::String(s) | TypedValue::EntitySelector(s) | TypedValue::Dimension(s) => {
                Some(s.clone())
            }
            _ => None,
        }
    }
}

impl ParameterValue for Vec3 {
    fn from_value(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }
}

impl ParameterValue for Uuid {
    fn from_value(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::Uuid(id) => Some(*id),
            TypedValue::String(s) => parse_canonical_uuid(s),
            _ => None,
        }
    }
}
