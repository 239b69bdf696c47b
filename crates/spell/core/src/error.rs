//! Common error infrastructure for spell-core.
//!
//! This module provides the severity classification and the trait shared by
//! every error type in the crate. Domain-specific errors (e.g. `DecodeError`,
//! `ValidationError`, `CastError`) live next to the code that produces them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each stage has its own error type with specific variants
//! - **Aggregation**: Validation problems are collected, never short-circuited
//! - **Severity Classification**: Errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Conditions that may succeed later (cooldown, not enough mana)
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected failures inside spell logic that require investigation
/// - **Fatal**: Broken invariants in the engine itself
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with the same or different input later.
    ///
    /// Examples: precondition not met, caster already casting
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: malformed JSON, unknown parameter, type mismatch
    Validation,

    /// Internal error - a spell's effect logic failed mid-execution.
    Internal,

    /// Fatal error - engine invariant violated.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all spell-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a stable SCREAMING_CASE code per variant from `error_code`
pub trait SpellError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
