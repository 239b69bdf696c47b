//! The cast orchestrator.

use super::costs::{mana_cost, resolve_cooldown_ticks};
use super::{CastError, CastPhase, CastReport, ParameterGuard};
use crate::config::{SpellParameterConfig, SpellParameterLoader};
use crate::env::{
    Audience, CastCheck, CastContext, CastEvent, CastObserver, Caster, ParameterizedSpell, Spell,
    SpellRegistry,
};
use crate::error::SpellError;
use crate::options::{CastOptions, CastSource};
use crate::params::SpellParameters;

/// Runs parameterized casts end to end.
///
/// Each cast validates its input, installs the resolved configuration on the
/// spell, executes, applies mana and cooldown, and always restores the
/// spell's previous configuration before returning.
pub struct SpellCastManager<'a> {
    loader: &'a SpellParameterLoader,
    observer: &'a mut dyn CastObserver,
    source: CastSource,
}

impl<'a> SpellCastManager<'a> {
    /// Manager casting from [`CastSource::Command`].
    pub fn new(loader: &'a SpellParameterLoader, observer: &'a mut dyn CastObserver) -> Self {
        Self {
            loader,
            observer,
            source: CastSource::Command,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: CastSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> CastSource {
        self.source
    }

    pub fn loader(&self) -> &SpellParameterLoader {
        self.loader
    }

    /// Casts `spell_id` with parameters given as JSON text.
    ///
    /// Malformed text is rejected with [`CastError::Decode`] before any
    /// spell is looked up.
    pub fn cast_spell(
        &mut self,
        registry: &mut dyn SpellRegistry,
        caster: &mut dyn Caster,
        spell_id: &str,
        level: u32,
        text: &str,
    ) -> Result<CastReport, CastError> {
        let params = SpellParameters::from_text(text).map_err(|err| {
            tracing::warn!(spell = spell_id, error = %err, "failed to parse cast parameters");
            CastError::Decode(err)
        })?;
        self.cast_spell_with(registry, caster, spell_id, level, &params)
    }

    /// Casts `spell_id` with an already-decoded parameter set.
    ///
    /// Spells without parameter support take their normal cast path instead.
    pub fn cast_spell_with(
        &mut self,
        registry: &mut dyn SpellRegistry,
        caster: &mut dyn Caster,
        spell_id: &str,
        level: u32,
        params: &SpellParameters,
    ) -> Result<CastReport, CastError> {
        let Some(spell) = registry.spell_mut(spell_id) else {
            tracing::warn!(spell = spell_id, "unknown spell");
            return Err(CastError::UnknownSpell(spell_id.to_owned()));
        };

        match spell.as_parameterized_mut() {
            Some(parameterized) => self.cast_parameterized(parameterized, caster, level, params),
            None => self.cast_fallback(spell, caster, level),
        }
    }

    /// Validates, applies, and runs the effect only.
    ///
    /// Skips admissibility checks, mana, cooldown, and notifications; the
    /// caller handles those. The spell's configuration is still restored.
    pub fn cast_spell_direct(
        &self,
        spell: &mut dyn ParameterizedSpell,
        caster: &mut dyn Caster,
        level: u32,
        params: &SpellParameters,
    ) -> Result<(), CastError> {
        let spell_id = spell.id().to_owned();
        let normalized = spell
            .parameter_schema()
            .validate(params)
            .into_result()
            .map_err(|errors| {
                tracing::warn!(spell = %spell_id, %errors, "direct cast parameters rejected");
                CastError::Validation(errors)
            })?;

        let supplied = spell.parameter_schema().supplied_values(params, &normalized);
        let baseline = spell.snapshot_parameters();
        let resolved = self.loader.resolve(&spell_id, &supplied, &baseline);
        let mut guard = ParameterGuard::apply(spell, resolved);

        let mut ctx = CastContext {
            level,
            source: self.source,
            caster,
        };
        guard
            .on_cast_with_parameters(&mut ctx, &normalized)
            .map_err(|error| {
                tracing::error!(spell = %spell_id, %error, "direct cast failed");
                CastError::Execution { spell_id, error }
            })
    }

    fn cast_fallback(
        &mut self,
        spell: &mut dyn Spell,
        caster: &mut dyn Caster,
        level: u32,
    ) -> Result<CastReport, CastError> {
        tracing::warn!(
            spell = spell.id(),
            "spell does not support parameterized casting, using its normal cast"
        );

        if !spell.attempt_initiate_cast(level, caster, self.source) {
            return Err(CastError::FallbackDeclined(spell.id().to_owned()));
        }

        Ok(CastReport {
            spell_id: spell.id().to_owned(),
            level,
            config: SpellParameterConfig::DEFAULT,
            options: CastOptions::from_source(self.source),
            mana_cost: None,
            cooldown_ticks: None,
            cast_bar_started: false,
            fallback: true,
            message: format!(
                "'{}' does not support parameterized casting, cast normally",
                spell.name()
            ),
        })
    }

    fn cast_parameterized(
        &mut self,
        spell: &mut dyn ParameterizedSpell,
        caster: &mut dyn Caster,
        level: u32,
        params: &SpellParameters,
    ) -> Result<CastReport, CastError> {
        let spell_id = spell.id().to_owned();
        let mut phase = PhaseTracker::new(&spell_id);

        phase.advance(CastPhase::Validating);
        let normalized = match spell.parameter_schema().validate(params).into_result() {
            Ok(normalized) => normalized,
            Err(errors) => {
                phase.advance(CastPhase::Rejected);
                tracing::warn!(spell = %spell_id, %errors, "cast parameters rejected");
                return Err(CastError::Validation(errors));
            }
        };

        phase.advance(CastPhase::Preparing);
        // Filled-in schema defaults are not runtime overrides.
        let supplied = spell.parameter_schema().supplied_values(params, &normalized);
        let baseline = spell.snapshot_parameters();
        let resolved = self.loader.resolve(&spell_id, &supplied, &baseline);
        let options = CastOptions::from_parameters(self.source, &normalized);
        let mut guard = ParameterGuard::apply(spell, resolved);

        phase.advance(CastPhase::Executing);
        let mut cast_bar_started = false;
        let outcome = self.execute(
            &mut *guard,
            caster,
            level,
            &normalized,
            &resolved,
            options,
            &mut cast_bar_started,
        );

        match &outcome {
            Ok(_) => phase.advance(CastPhase::Succeeded),
            Err(err) => {
                phase.advance(CastPhase::Failed);
                if cast_bar_started {
                    caster.reset_casting_state();
                    self.observer.notify(
                        Audience::Tracking,
                        CastEvent::CastFinished {
                            caster: caster.id(),
                            spell_id: spell_id.clone(),
                            interrupted: true,
                        },
                    );
                }
                tracing::warn!(
                    spell = %spell_id,
                    code = err.error_code(),
                    severity = %err.severity(),
                    error = %err,
                    "cast failed"
                );
            }
        }

        guard.restore();
        phase.advance(CastPhase::Restored);

        let executed = outcome?;
        Ok(CastReport {
            spell_id,
            level,
            config: resolved,
            options,
            mana_cost: executed.mana_cost,
            cooldown_ticks: executed.cooldown_ticks,
            cast_bar_started,
            fallback: false,
            message: executed.message,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        spell: &mut dyn ParameterizedSpell,
        caster: &mut dyn Caster,
        level: u32,
        params: &SpellParameters,
        resolved: &SpellParameterConfig,
        options: CastOptions,
        cast_bar_started: &mut bool,
    ) -> Result<Executed, CastError> {
        let spell_id = spell.id().to_owned();

        if !options.bypass_conditions() {
            if let CastCheck::Denied(message) = spell.can_be_cast_by(level, self.source, &*caster) {
                let message = message.unwrap_or_else(|| format!("cannot cast '{}' now", spell.name()));
                return Err(CastError::NotCastable { spell_id, message });
            }
            if !spell.check_pre_cast_conditions(level, caster) {
                return Err(CastError::PreconditionFailed { spell_id });
            }
        }

        if options.show_cast_bar() {
            let duration = spell.effective_cast_time(level, &*caster);
            if duration > 0 && !caster.is_casting() {
                caster.initiate_cast(&spell_id, level, duration, self.source);
                *cast_bar_started = true;
                self.observer.notify(
                    Audience::Tracking,
                    CastEvent::CastStarted {
                        caster: caster.id(),
                        spell_id: spell_id.clone(),
                        level,
                        duration,
                    },
                );
            }
        }

        {
            let mut ctx = CastContext {
                level,
                source: self.source,
                caster: &mut *caster,
            };
            if let Err(error) = spell.on_cast_with_parameters(&mut ctx, params) {
                tracing::error!(spell = %spell_id, %error, "spell effect failed");
                return Err(CastError::Execution { spell_id, error });
            }
        }

        let mut spent = None;
        if options.consume_mana() {
            let cost = mana_cost(resolved, level, spell.mana_multiplier());
            if cost > 0 {
                let mana = caster.mana().saturating_sub(cost).max(0);
                caster.set_mana(mana);
                self.observer.notify(
                    Audience::Caster,
                    CastEvent::ManaChanged {
                        caster: caster.id(),
                        mana,
                    },
                );
            }
            spent = Some(cost);
        }

        let mut cooldown_ticks = None;
        if options.trigger_cooldown() {
            let default_ticks = spell.default_cooldown_ticks();
            let live_ticks = caster.effective_cooldown(&spell_id, default_ticks);
            let ticks = resolve_cooldown_ticks(resolved.cooldown_ticks(), default_ticks, live_ticks);
            caster.add_cooldown(&spell_id, ticks);
            cooldown_ticks = Some(ticks);
        }

        if options.play_effects() {
            self.observer.notify(
                Audience::Caster,
                CastEvent::EffectReplay {
                    spell_id: spell_id.clone(),
                    level,
                    source: self.source,
                    data: params.to_binary(),
                },
            );
        }

        let mut ctx = CastContext {
            level,
            source: self.source,
            caster,
        };
        spell.on_cast_complete(&mut ctx);

        tracing::info!(
            spell = %spell_id,
            level,
            mana_cost = ?spent,
            cooldown_ticks = ?cooldown_ticks,
            "cast complete"
        );

        Ok(Executed {
            mana_cost: spent,
            cooldown_ticks,
            message: format!("cast {}", spell.name()),
        })
    }
}

/// Side effects of a successful execution.
struct Executed {
    mana_cost: Option<i32>,
    cooldown_ticks: Option<i32>,
    message: String,
}

/// Logs phase transitions of one cast.
struct PhaseTracker<'s> {
    spell_id: &'s str,
    phase: CastPhase,
}

impl<'s> PhaseTracker<'s> {
    fn new(spell_id: &'s str) -> Self {
        Self {
            spell_id,
            phase: CastPhase::Idle,
        }
    }

    fn advance(&mut self, next: CastPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal cast transition {} -> {}",
            self.phase.as_str(),
            next.as_str()
        );
        tracing::debug!(
            spell = self.spell_id,
            from = self.phase.as_str(),
            to = next.as_str(),
            "cast phase"
        );
        self.phase = next;
    }
}
