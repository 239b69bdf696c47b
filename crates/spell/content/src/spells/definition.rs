//! Data-driven spell definitions as written in the catalog.

use serde::{Deserialize, Serialize};
use spell_core::{ParameterType, SchemaBuilder, SpellParameterConfig, TypedValue};

/// One catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellDefinition {
    pub id: String,
    pub name: String,
    /// Whether the spell accepts parameterized casts.
    #[serde(default = "default_parameterized")]
    pub parameterized: bool,
    /// Code-level defaults, shadowed field by field by the override table.
    #[serde(default)]
    pub defaults: SpellParameterConfig,
    /// Fields declared on top of the standard configuration fields.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    pub effect: EffectSpec,
}

fn default_parameterized() -> bool {
    true
}

/// A schema field declared by a catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<TypedValue>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl FieldSpec {
    /// Adds this field and its aliases to `builder`.
    pub fn declare(&self, builder: SchemaBuilder) -> SchemaBuilder {
        let builder = match (&self.default, self.required) {
            (_, true) => builder.required(&self.name, self.kind, &self.description),
            (Some(default), false) => {
                builder.optional(&self.name, self.kind, default.clone(), &self.description)
            }
            (None, false) => builder.optional_unset(&self.name, self.kind, &self.description),
        };
        self.aliases
            .iter()
            .fold(builder, |builder, alias| builder.alias(alias, &self.name))
    }
}

/// What a catalog spell does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectSpec {
    /// Strikes the `target` position with the spell's power.
    Projectile,
    /// Moves the caster by `offset`, up to `max_distance` blocks.
    Blink { max_distance: f64 },
    /// Restores mana equal to the spell's power.
    ManaSurge,
}
