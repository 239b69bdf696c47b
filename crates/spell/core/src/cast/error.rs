//! Cast orchestration errors.

use super::CastPhase;
use crate::env::EffectError;
use crate::error::{ErrorSeverity, SpellError};
use crate::params::{DecodeError, ValidationErrors};

/// Why an orchestrated cast did not succeed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    /// The parameter text or tag could not be decoded.
    #[error("failed to parse parameters: {0}")]
    Decode(#[from] DecodeError),

    /// The parameters did not satisfy the spell's schema.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("unknown spell: {0}")]
    UnknownSpell(String),

    /// Direct casts require a parameterized spell.
    #[error("spell '{0}' does not support parameterized casting")]
    NotParameterized(String),

    /// The fixed cast path declined to start.
    #[error("spell '{0}' could not be cast")]
    FallbackDeclined(String),

    /// The caster may not cast this spell right now.
    #[error("{message}")]
    NotCastable { spell_id: String, message: String },

    #[error("pre-cast conditions not met for '{spell_id}'")]
    PreconditionFailed { spell_id: String },

    /// The spell's effect failed mid-execution.
    #[error("error while casting '{spell_id}': {error}")]
    Execution {
        spell_id: String,
        #[source]
        error: EffectError,
    },
}

impl CastError {
    /// The phase the cast ended in before restoration.
    pub const fn phase(&self) -> CastPhase {
        match self {
            CastError::Decode(_)
            | CastError::Validation(_)
            | CastError::UnknownSpell(_)
            | CastError::NotParameterized(_) => CastPhase::Rejected,
            CastError::FallbackDeclined(_)
            | CastError::NotCastable { .. }
            | CastError::PreconditionFailed { .. }
            | CastError::Execution { .. } => CastPhase::Failed,
        }
    }
}

impl SpellError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CastError::Decode(e) => e.severity(),
            CastError::Validation(e) => e.severity(),
            CastError::UnknownSpell(_) | CastError::NotParameterized(_) => ErrorSeverity::Validation,
            CastError::FallbackDeclined(_)
            | CastError::NotCastable { .. }
            | CastError::PreconditionFailed { .. } => ErrorSeverity::Recoverable,
            CastError::Execution { error, .. } => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CastError::Decode(e) => e.error_code(),
            CastError::Validation(e) => e.error_code(),
            CastError::UnknownSpell(_) => "CAST_UNKNOWN_SPELL",
            CastError::NotParameterized(_) => "CAST_NOT_PARAMETERIZED",
            CastError::FallbackDeclined(_) => "CAST_FALLBACK_DECLINED",
            CastError::NotCastable { .. } => "CAST_NOT_CASTABLE",
            CastError::PreconditionFailed { .. } => "CAST_PRECONDITION_FAILED",
            CastError::Execution { .. } => "CAST_EXECUTION_FAILED",
        }
    }
}
