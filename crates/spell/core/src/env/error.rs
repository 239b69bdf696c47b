//! Errors raised by spell effect logic.

use crate::error::{ErrorSeverity, SpellError};

/// Failure inside a spell's effect while it executes.
///
/// The orchestrator catches these, reports them to the caller, and still
/// restores the spell's configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// The effect needs a parameter that validation let through as absent.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// The requested target is out of reach or does not exist.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Any other effect failure.
    #[error("{0}")]
    Failed(String),
}

impl SpellError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            EffectError::MissingParameter(_) => "EFFECT_MISSING_PARAMETER",
            EffectError::InvalidTarget(_) => "EFFECT_INVALID_TARGET",
            EffectError::Failed(_) => "EFFECT_FAILED",
        }
    }
}
