//! Spell parameter resolution and transactional cast orchestration.
//!
//! `spell-core` decodes and validates dynamically-typed spell parameters,
//! merges file, code, and runtime configuration layers, and runs casts through
//! [`cast::SpellCastManager`], which guarantees that a spell's configuration is
//! restored on every exit path. Data sources, spells, and casters are injected
//! through the traits in [`env`] and [`config::ParameterSource`].
pub mod cast;
pub mod config;
pub mod env;
pub mod error;
pub mod options;
pub mod params;

pub use cast::{
    CastError, CastPhase, CastReport, ParameterGuard, SpellCastManager, mana_cost,
    resolve_cooldown_ticks,
};
pub use config::{
    ConfigField, ConfigFields, LoadError, LoadedConfig, NoParameterSource, ParameterRecord,
    ParameterSource, ParameterTable, SpellParameterConfig, SpellParameterLoader, TICKS_PER_SECOND,
};
pub use env::{
    ActiveCast, Audience, CastCheck, CastContext, CastEvent, CastObserver, Caster, CasterState,
    EffectError, NullObserver, ParameterizedSpell, RecordingObserver, Spell, SpellRegistry,
};
pub use error::{ErrorSeverity, SpellError};
pub use options::{CastFlag, CastOptions, CastOptionsBuilder, CastSource};
pub use params::{
    DecodeError, ParameterDefinition, ParameterType, ParameterValue, SchemaBuilder, SchemaError,
    SpellParameterSchema, SpellParameters, Tag, TagCompound, TypedValue, ValidationError,
    ValidationErrors, ValidationResult, Vec3,
};
