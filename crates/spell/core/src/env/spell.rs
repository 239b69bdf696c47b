//! Spell traits.
//!
//! A [`Spell`] is anything castable through its normal fixed code path. Spells
//! that also accept schema-validated parameters implement
//! [`ParameterizedSpell`] and expose it through
//! [`Spell::as_parameterized_mut`].

use super::{Caster, EffectError};
use crate::config::SpellParameterConfig;
use crate::options::CastSource;
use crate::params::{SpellParameterSchema, SpellParameters};

pub trait Spell {
    /// Registry id, e.g. `"fireball"`.
    fn id(&self) -> &str;

    /// Display name used in messages.
    fn name(&self) -> &str;

    /// Normal, non-parameterized cast. Returns whether the cast started.
    fn attempt_initiate_cast(&mut self, level: u32, caster: &mut dyn Caster, source: CastSource) -> bool;

    fn as_parameterized(&self) -> Option<&dyn ParameterizedSpell> {
        None
    }

    fn as_parameterized_mut(&mut self) -> Option<&mut dyn ParameterizedSpell> {
        None
    }
}

/// Outcome of an admissibility check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastCheck {
    Allowed,
    Denied(Option<String>),
}

impl CastCheck {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, CastCheck::Allowed)
    }
}

/// What effect logic sees of the cast it runs in.
pub struct CastContext<'a> {
    pub level: u32,
    pub source: CastSource,
    pub caster: &'a mut dyn Caster,
}

/// A spell whose behavior can be driven by a parameter set.
///
/// The live configuration is shared state of the spell: the orchestrator
/// replaces it for the duration of one cast and restores it afterwards.
pub trait ParameterizedSpell: Spell {
    fn parameter_schema(&self) -> &SpellParameterSchema;

    /// Current live configuration.
    fn parameter_config(&self) -> SpellParameterConfig;

    fn set_parameter_config(&mut self, config: SpellParameterConfig);

    fn snapshot_parameters(&self) -> SpellParameterConfig {
        self.parameter_config()
    }

    /// Installs `config` and returns the configuration it replaced.
    fn apply_parameter_overrides(&mut self, config: SpellParameterConfig) -> SpellParameterConfig {
        let previous = self.parameter_config();
        self.set_parameter_config(config);
        previous
    }

    fn restore_parameters(&mut self, previous: SpellParameterConfig) {
        self.set_parameter_config(previous);
    }

    /// Unmodified cooldown of this spell, in ticks.
    fn default_cooldown_ticks(&self) -> i32;

    /// Scale applied to computed mana costs.
    fn mana_multiplier(&self) -> f64 {
        1.0
    }

    /// Cast duration in ticks for `level`, from the live configuration.
    fn effective_cast_time(&self, level: u32, caster: &dyn Caster) -> i32 {
        let _ = (level, caster);
        self.parameter_config().cast_time
    }

    fn can_be_cast_by(&self, level: u32, source: CastSource, caster: &dyn Caster) -> CastCheck {
        let _ = (level, source, caster);
        CastCheck::Allowed
    }

    fn check_pre_cast_conditions(&mut self, level: u32, caster: &mut dyn Caster) -> bool {
        let _ = (level, caster);
        true
    }

    /// Runs the spell's effect with validated, normalized parameters.
    fn on_cast_with_parameters(
        &mut self,
        ctx: &mut CastContext<'_>,
        params: &SpellParameters,
    ) -> Result<(), EffectError>;

    /// Called once after a successful orchestrated cast.
    fn on_cast_complete(&mut self, ctx: &mut CastContext<'_>) {
        let _ = ctx;
    }
}
