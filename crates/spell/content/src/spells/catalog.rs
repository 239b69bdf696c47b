//! Concrete spells built from catalog definitions.

use spell_core::{
    CastCheck, CastContext, CastOptions, CastSource, Caster, EffectError, ParameterizedSpell,
    SchemaError, Spell, SpellParameterConfig, SpellParameterLoader, SpellParameterSchema,
    SpellParameters, Vec3, mana_cost,
};

use super::{EffectSpec, SpellDefinition};
use crate::loaders::SpellTuning;

/// Result of the most recent effect a spell resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectOutcome {
    pub level: u32,
    pub source: CastSource,
    pub power: i32,
    /// Impact point or landing offset, for positional effects.
    pub position: Option<Vec3>,
}

/// A spell driven by its catalog definition.
#[derive(Debug)]
pub struct CatalogSpell {
    definition: SpellDefinition,
    tuning: SpellTuning,
    schema: SpellParameterSchema,
    /// Configuration after the override table was applied at construction.
    base: SpellParameterConfig,
    live: SpellParameterConfig,
    last_outcome: Option<EffectOutcome>,
}

impl CatalogSpell {
    /// Builds the spell, folding the override table into its defaults.
    ///
    /// The schema's configuration field defaults are the resolved values, so
    /// validated casts carry them forward as runtime overrides.
    pub fn new(
        definition: SpellDefinition,
        loader: &SpellParameterLoader,
        tuning: SpellTuning,
    ) -> Result<Self, SchemaError> {
        let base = if loader.has_config(&definition.id) {
            loader.resolve(&definition.id, &SpellParameters::empty(), &definition.defaults)
        } else {
            definition.defaults
        };

        let schema = definition
            .fields
            .iter()
            .fold(SpellParameterSchema::config_builder(&base), |builder, field| {
                field.declare(builder)
            })
            .build()?;

        Ok(Self {
            definition,
            tuning,
            schema,
            base,
            live: base,
            last_outcome: None,
        })
    }

    pub fn definition(&self) -> &SpellDefinition {
        &self.definition
    }

    pub fn tuning(&self) -> SpellTuning {
        self.tuning
    }

    pub fn schema(&self) -> &SpellParameterSchema {
        &self.schema
    }

    pub fn base_config(&self) -> SpellParameterConfig {
        self.base
    }

    pub fn last_outcome(&self) -> Option<&EffectOutcome> {
        self.last_outcome.as_ref()
    }

    fn mana_cost(&self, level: u32) -> i32 {
        mana_cost(&self.live, level, self.tuning.mana_multiplier)
    }

    fn resolve_effect(
        &mut self,
        ctx: &mut CastContext<'_>,
        params: &SpellParameters,
    ) -> Result<(), EffectError> {
        let power = self.live.spell_power(ctx.level);
        let position = match self.definition.effect {
            EffectSpec::Projectile => {
                let target = params
                    .get_vec3("target")
                    .ok_or_else(|| EffectError::MissingParameter("target".into()))?;
                tracing::debug!(spell = %self.definition.id, %target, power, "projectile released");
                Some(target)
            }
            EffectSpec::Blink { max_distance } => {
                let offset = params
                    .get_vec3("offset")
                    .ok_or_else(|| EffectError::MissingParameter("offset".into()))?;
                let distance = (offset.x * offset.x + offset.y * offset.y + offset.z * offset.z).sqrt();
                if distance > max_distance {
                    return Err(EffectError::InvalidTarget(format!(
                        "{offset} is {distance:.1} blocks away, limit is {max_distance}"
                    )));
                }
                Some(offset)
            }
            EffectSpec::ManaSurge => {
                let restored = ctx.caster.mana().saturating_add(power.max(0));
                ctx.caster.set_mana(restored);
                None
            }
        };

        self.last_outcome = Some(EffectOutcome {
            level: ctx.level,
            source: ctx.source,
            power,
            position,
        });
        Ok(())
    }
}

impl Spell for CatalogSpell {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    /// Fixed cast path: schema defaults only, options from `source`.
    fn attempt_initiate_cast(&mut self, level: u32, caster: &mut dyn Caster, source: CastSource) -> bool {
        if !self.tuning.enabled {
            tracing::warn!(spell = %self.definition.id, "spell is disabled");
            return false;
        }
        let params = match self.schema.validate(&SpellParameters::empty()).into_result() {
            Ok(params) => params,
            Err(errors) => {
                tracing::warn!(spell = %self.definition.id, %errors, "spell needs parameters to cast");
                return false;
            }
        };

        let options = CastOptions::from_source(source);
        let cost = self.mana_cost(level);
        if options.consume_mana() && caster.mana() < cost {
            return false;
        }

        {
            let mut ctx = CastContext {
                level,
                source,
                caster: &mut *caster,
            };
            if let Err(error) = self.resolve_effect(&mut ctx, &params) {
                tracing::warn!(spell = %self.definition.id, %error, "cast failed");
                return false;
            }
        }

        if options.consume_mana() && cost > 0 {
            caster.set_mana((caster.mana() - cost).max(0));
        }
        if options.trigger_cooldown() {
            let ticks = caster.effective_cooldown(&self.definition.id, self.live.cooldown_ticks());
            caster.add_cooldown(&self.definition.id, ticks);
        }
        true
    }

    fn as_parameterized(&self) -> Option<&dyn ParameterizedSpell> {
        if self.definition.parameterized {
            Some(self)
        } else {
            None
        }
    }

    fn as_parameterized_mut(&mut self) -> Option<&mut dyn ParameterizedSpell> {
        if self.definition.parameterized {
            Some(self)
        } else {
            None
        }
    }
}

impl ParameterizedSpell for CatalogSpell {
    fn parameter_schema(&self) -> &SpellParameterSchema {
        &self.schema
    }

    fn parameter_config(&self) -> SpellParameterConfig {
        self.live
    }

    fn set_parameter_config(&mut self, config: SpellParameterConfig) {
        self.live = config;
    }

    fn default_cooldown_ticks(&self) -> i32 {
        self.base.cooldown_ticks()
    }

    fn mana_multiplier(&self) -> f64 {
        self.tuning.mana_multiplier
    }

    fn can_be_cast_by(&self, level: u32, source: CastSource, caster: &dyn Caster) -> CastCheck {
        if !self.tuning.enabled {
            return CastCheck::Denied(Some(format!("{} is disabled", self.definition.name)));
        }
        if CastOptions::from_source(source).consume_mana() && caster.mana() < self.mana_cost(level) {
            return CastCheck::Denied(Some(format!(
                "not enough mana to cast {}",
                self.definition.name
            )));
        }
        CastCheck::Allowed
    }

    fn on_cast_with_parameters(
        &mut self,
        ctx: &mut CastContext<'_>,
        params: &SpellParameters,
    ) -> Result<(), EffectError> {
        self.resolve_effect(ctx, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spell_core::{CasterState, ParameterRecord, ParameterTable, ParameterType, TypedValue};
    use uuid::Uuid;

    use crate::spells::FieldSpec;

    fn surge() -> SpellDefinition {
        SpellDefinition {
            id: "surge".into(),
            name: "Mana Surge".into(),
            parameterized: false,
            defaults: SpellParameterConfig {
                base_mana_cost: 10,
                base_spell_power: 15,
                spell_power_per_level: 5,
                cooldown: 2.0,
                ..SpellParameterConfig::DEFAULT
            },
            fields: Vec::new(),
            effect: EffectSpec::ManaSurge,
        }
    }

    #[test]
    fn override_table_is_folded_into_base_config() {
        let table: ParameterTable = [(
            "surge",
            ParameterRecord {
                cooldown: Some(6.0),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect();
        let loader = SpellParameterLoader::from_table(table);

        let spell = CatalogSpell::new(surge(), &loader, SpellTuning::default()).unwrap();

        assert_eq!(spell.base_config().cooldown, 6.0);
        assert_eq!(spell.base_config().base_mana_cost, 10);
        assert_eq!(spell.default_cooldown_ticks(), 120);
        assert_eq!(
            spell.schema().definition("cooldown").unwrap().default,
            Some(TypedValue::Double(6.0))
        );
    }

    #[test]
    fn non_parameterized_spell_hides_its_parameter_interface() {
        let loader = SpellParameterLoader::empty();
        let mut spell = CatalogSpell::new(surge(), &loader, SpellTuning::default()).unwrap();
        assert!(spell.as_parameterized().is_none());
        assert!(spell.as_parameterized_mut().is_none());
    }

    #[test]
    fn fixed_path_spends_mana_then_restores_power() {
        let loader = SpellParameterLoader::empty();
        let mut spell = CatalogSpell::new(surge(), &loader, SpellTuning::default()).unwrap();
        let mut caster = CasterState::new(Uuid::nil(), 50);

        assert!(spell.attempt_initiate_cast(2, &mut caster, CastSource::Spellbook));
        // +20 power, then -10 cost
        assert_eq!(caster.mana(), 60);
        assert_eq!(caster.cooldown("surge"), Some(40));
        assert_eq!(spell.last_outcome().unwrap().power, 20);
    }

    #[test]
    fn fixed_path_refuses_when_mana_is_short_or_disabled() {
        let loader = SpellParameterLoader::empty();
        let mut spell = CatalogSpell::new(surge(), &loader, SpellTuning::default()).unwrap();
        let mut caster = CasterState::new(Uuid::nil(), 5);
        assert!(!spell.attempt_initiate_cast(1, &mut caster, CastSource::Spellbook));
        assert_eq!(caster.mana(), 5);

        let disabled = SpellTuning {
            enabled: false,
            ..SpellTuning::default()
        };
        let mut spell = CatalogSpell::new(surge(), &loader, disabled).unwrap();
        assert!(!spell.attempt_initiate_cast(1, &mut caster, CastSource::Command));
    }

    #[test]
    fn fixed_path_fails_when_a_field_is_required() {
        let definition = SpellDefinition {
            id: "bolt".into(),
            name: "Bolt".into(),
            parameterized: true,
            defaults: SpellParameterConfig::DEFAULT,
            fields: vec![FieldSpec {
                name: "target".into(),
                kind: ParameterType::Vec3,
                required: true,
                default: None,
                description: "Impact point".into(),
                aliases: vec!["at".into()],
            }],
            effect: EffectSpec::Projectile,
        };
        let loader = SpellParameterLoader::empty();
        let mut spell = CatalogSpell::new(definition, &loader, SpellTuning::default()).unwrap();
        let mut caster = CasterState::new(Uuid::nil(), 50);

        assert!(!spell.attempt_initiate_cast(1, &mut caster, CastSource::Command));
        assert_eq!(spell.schema().resolve_key("at"), Some("target"));
    }

    #[test]
    fn admissibility_follows_tuning_and_source() {
        let loader = SpellParameterLoader::empty();
        let spell = CatalogSpell::new(surge(), &loader, SpellTuning::default()).unwrap();
        let poor = CasterState::new(Uuid::nil(), 0);

        assert!(matches!(
            spell.can_be_cast_by(1, CastSource::Spellbook, &poor),
            CastCheck::Denied(Some(_))
        ));
        assert_eq!(spell.can_be_cast_by(1, CastSource::Scroll, &poor), CastCheck::Allowed);
    }
}
