//! Parameter decoding, schema construction, and validation errors.

use crate::error::{ErrorSeverity, SpellError};

use super::ParameterType;

// ============================================================================
// Decode Errors
// ============================================================================

/// Malformed text or binary input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The text was not syntactically valid.
    #[error("invalid parameter text: {0}")]
    Syntax(String),

    /// The text parsed, but its root is not a flat key/value record.
    #[error("parameter text must be an object, found {found}")]
    NotAnObject { found: &'static str },

    /// A field could not be decoded as the expected kind.
    #[error("parameter '{key}': expected {expected}, found {found}")]
    Field {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An integer literal does not fit the 32-bit integer kind.
    #[error("parameter '{key}': integer {literal} is out of range")]
    IntegerOutOfRange { key: String, literal: String },

    /// The binary record holds a tag kind with no parameter counterpart.
    #[error("parameter '{key}': unsupported tag kind {kind}")]
    UnsupportedTag { key: String, kind: &'static str },

    /// The byte encoding of a tag record is corrupt.
    #[error("tag encoding failed: {0}")]
    Encoding(String),
}

impl DecodeError {
    pub(crate) fn field(key: &str, expected: &'static str, found: &'static str) -> Self {
        Self::Field {
            key: key.to_owned(),
            expected,
            found,
        }
    }
}

impl SpellError for DecodeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "DECODE_SYNTAX",
            Self::NotAnObject { .. } => "DECODE_NOT_AN_OBJECT",
            Self::Field { .. } => "DECODE_FIELD",
            Self::IntegerOutOfRange { .. } => "DECODE_INTEGER_OUT_OF_RANGE",
            Self::UnsupportedTag { .. } => "DECODE_UNSUPPORTED_TAG",
            Self::Encoding(_) => "DECODE_ENCODING",
        }
    }
}

// ============================================================================
// Schema Construction Errors
// ============================================================================

/// Rejected while building a schema. Raised at build time, never during validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("field '{0}' shadows a global parameter")]
    ShadowsGlobal(String),

    #[error("alias '{alias}' points to unknown field '{target}'")]
    DanglingAlias { alias: String, target: String },

    #[error("alias '{0}' collides with an existing field or alias")]
    DuplicateAlias(String),

    #[error("default for field '{name}' is not a valid {expected}")]
    InvalidDefault {
        name: String,
        expected: &'static str,
    },
}

impl SpellError for SchemaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateField(_) => "SCHEMA_DUPLICATE_FIELD",
            Self::ShadowsGlobal(_) => "SCHEMA_SHADOWS_GLOBAL",
            Self::DanglingAlias { .. } => "SCHEMA_DANGLING_ALIAS",
            Self::DuplicateAlias(_) => "SCHEMA_DUPLICATE_ALIAS",
            Self::InvalidDefault { .. } => "SCHEMA_INVALID_DEFAULT",
        }
    }
}

// ============================================================================
// Validation Errors
// ============================================================================

/// A single problem found while validating a container against a schema.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("parameter '{key}' has the wrong type, expected {}", .expected.display_name())]
    TypeMismatch {
        key: String,
        expected: ParameterType,
    },

    #[error("parameter '{key}' cannot be converted to a valid value")]
    Unconvertible { key: String },

    #[error("parameter '{0}' is defined more than once")]
    Duplicate(String),

    #[error("missing required parameter: {0}")]
    MissingRequired(String),
}

/// Every problem found in one validation pass, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

/// Renders as the newline-joined list of every error message.
impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl SpellError for ValidationErrors {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }
}
