//! Parameter schemas: declared fields, aliases, and validation.
//!
//! A schema is built once per spell through [`SchemaBuilder`], which rejects
//! duplicate or dangling aliases at build time. Every schema implicitly
//! accepts the global cast-option flags (see [`global_definitions`]).
//!
//! Validation is a single exhaustive pass: every problem in the input is
//! reported at once, and the output is a new, alias-free container with
//! defaults filled in for absent optional fields.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use super::error::{SchemaError, ValidationError, ValidationErrors};
use super::{ParameterType, SpellParameters, TypedValue};
use crate::config::{ConfigField, SpellParameterConfig};
use crate::options::CastFlag;

/// A declared schema field.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub kind: ParameterType,
    pub required: bool,
    /// Normalized default; `None` for required fields and unset optionals.
    pub default: Option<TypedValue>,
    pub description: String,
    pub aliases: Vec<String>,
}

static GLOBAL_DEFINITIONS: Lazy<IndexMap<String, ParameterDefinition>> = Lazy::new(|| {
    CastFlag::iter()
        .map(|flag| {
            let definition = ParameterDefinition {
                name: flag.key().to_owned(),
                kind: ParameterType::Boolean,
                required: false,
                default: Some(TypedValue::Boolean(flag.schema_default())),
                description: flag.description().to_owned(),
                aliases: Vec::new(),
            };
            (definition.name.clone(), definition)
        })
        .collect()
});

/// Fields every schema accepts in addition to its own: the cast-option flags.
///
/// Their defaults are informational only; validation never fills them in, so
/// an absent flag falls back to the cast source's default.
pub fn global_definitions() -> &'static IndexMap<String, ParameterDefinition> {
    &GLOBAL_DEFINITIONS
}

/// Immutable set of field definitions plus an alias table.
#[derive(Clone, Debug, Default)]
pub struct SpellParameterSchema {
    definitions: IndexMap<String, ParameterDefinition>,
    alias_to_primary: HashMap<String, String>,
}

impl SpellParameterSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Builder pre-populated with the six configuration fields, defaulting to
    /// `defaults`, and their conventional aliases.
    pub fn config_builder(defaults: &SpellParameterConfig) -> SchemaBuilder {
        let mut builder = SchemaBuilder::default();
        for field in ConfigField::iter() {
            builder = builder.optional(
                field.key(),
                field.kind(),
                defaults.value(field),
                field.description(),
            );
            if let Some(alias) = field.alias() {
                builder = builder.alias(alias, field.key());
            }
        }
        builder
    }

    pub fn definitions(&self) -> &IndexMap<String, ParameterDefinition> {
        &self.definitions
    }

    /// Looks up a local or global definition by canonical name.
    pub fn definition(&self, name: &str) -> Option<&ParameterDefinition> {
        self.definitions
            .get(name)
            .or_else(|| GLOBAL_DEFINITIONS.get(name))
    }

    /// Maps a supplied key to its canonical field name.
    pub fn resolve_key<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.definitions.contains_key(key) || GLOBAL_DEFINITIONS.contains_key(key) {
            return Some(key);
        }
        self.alias_to_primary.get(key).map(String::as_str)
    }

    /// Validates and normalizes `parameters` against this schema.
    pub fn validate(&self, parameters: &SpellParameters) -> ValidationResult {
        let mut normalized: IndexMap<String, TypedValue> = IndexMap::new();
        let mut errors = ValidationErrors::default();

        for (key, value) in parameters.iter() {
            let Some(canonical) = self.resolve_key(key) else {
                errors.push(ValidationError::UnknownParameter(key.to_owned()));
                continue;
            };

            let Some(definition) = self.definition(canonical) else {
                errors.push(ValidationError::UnknownParameter(canonical.to_owned()));
                continue;
            };

            if !definition.kind.is_valid(value) {
                errors.push(ValidationError::TypeMismatch {
                    key: key.to_owned(),
                    expected: definition.kind,
                });
                continue;
            }

            let Some(value) = definition.kind.normalize(value) else {
                errors.push(ValidationError::Unconvertible {
                    key: key.to_owned(),
                });
                continue;
            };

            if normalized.contains_key(canonical) {
                errors.push(ValidationError::Duplicate(canonical.to_owned()));
                continue;
            }

            normalized.insert(canonical.to_owned(), value);
        }

        for definition in self.definitions.values() {
            if normalized.contains_key(&definition.name) {
                continue;
            }
            if definition.required {
                errors.push(ValidationError::MissingRequired(definition.name.clone()));
            } else if let Some(default) = &definition.default {
                normalized.insert(definition.name.clone(), default.clone());
            }
        }

        if errors.is_empty() {
            ValidationResult::success(SpellParameters::from_validated_map(normalized))
        } else {
            ValidationResult::failure(errors)
        }
    }

    /// Entries of `normalized` whose field the caller named in `supplied`,
    /// under any alias. Defaults filled in by validation are left out.
    pub fn supplied_values(
        &self,
        supplied: &SpellParameters,
        normalized: &SpellParameters,
    ) -> SpellParameters {
        let mut explicit = SpellParameters::empty();
        for key in supplied.keys() {
            let Some(canonical) = self.resolve_key(key) else {
                continue;
            };
            if let Some(value) = normalized.value(canonical) {
                explicit.insert(canonical, value.clone());
            }
        }
        explicit
    }

    /// One line per local field: name, aliases, kind, default, description.
    pub fn usage(&self) -> String {
        self.definitions
            .values()
            .map(|definition| usage_line(definition) + "\n")
            .collect()
    }
}

fn usage_line(definition: &ParameterDefinition) -> String {
    let mut line = definition.name.clone();
    if !definition.aliases.is_empty() {
        line.push_str(&format!(" ({})", definition.aliases.join(", ")));
    }
    line.push_str(&format!(" : {}", definition.kind.display_name()));
    match (&definition.default, definition.required) {
        (_, true) => line.push_str(" [required]"),
        (Some(default), false) => line.push_str(&format!(" = {default}")),
        (None, false) => line.push_str(" [optional]"),
    }
    if !definition.description.is_empty() {
        line.push_str(&format!(" - {}", definition.description));
    }
    line
}

/// Outcome of [`SpellParameterSchema::validate`].
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationResult {
    errors: ValidationErrors,
    normalized: SpellParameters,
}

impl ValidationResult {
    fn success(normalized: SpellParameters) -> Self {
        Self {
            errors: ValidationErrors::default(),
            normalized,
        }
    }

    fn failure(errors: ValidationErrors) -> Self {
        Self {
            errors,
            normalized: SpellParameters::empty(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable summary; newline-joined errors on failure.
    pub fn message(&self) -> String {
        if self.is_success() {
            "parameters validated".to_owned()
        } else {
            self.errors.to_string()
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Normalized container; empty on failure.
    pub fn normalized(&self) -> &SpellParameters {
        &self.normalized
    }

    pub fn into_result(self) -> Result<SpellParameters, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.normalized)
        } else {
            Err(self.errors)
        }
    }
}

/// Collects field definitions and aliases for a [`SpellParameterSchema`].
///
/// Problems are recorded as they are found and reported by
/// [`SchemaBuilder::build`], so declaration order of aliases does not matter.
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    definitions: IndexMap<String, ParameterDefinition>,
    aliases: Vec<(String, String)>,
    errors: Vec<SchemaError>,
}

impl SchemaBuilder {
    pub fn required(self, name: &str, kind: ParameterType, description: &str) -> Self {
        self.define(name, kind, true, None, description)
    }

    pub fn optional(
        self,
        name: &str,
        kind: ParameterType,
        default: impl Into<TypedValue>,
        description: &str,
    ) -> Self {
        self.define(name, kind, false, Some(default.into()), description)
    }

    /// Optional field with no default; absent input leaves it absent.
    pub fn optional_unset(self, name: &str, kind: ParameterType, description: &str) -> Self {
        self.define(name, kind, false, None, description)
    }

    pub fn alias(mut self, alias: &str, primary: &str) -> Self {
        self.aliases.push((alias.to_owned(), primary.to_owned()));
        self
    }

    fn define(
        mut self,
        name: &str,
        kind: ParameterType,
        required: bool,
        default: Option<TypedValue>,
        description: &str,
    ) -> Self {
        if GLOBAL_DEFINITIONS.contains_key(name) {
            self.errors.push(SchemaError::ShadowsGlobal(name.to_owned()));
            return self;
        }
        if self.definitions.contains_key(name) {
            self.errors.push(SchemaError::DuplicateField(name.to_owned()));
            return self;
        }

        let default = match default {
            Some(value) => match kind.is_valid(&value).then(|| kind.normalize(&value)).flatten() {
                Some(normalized) => Some(normalized),
                None => {
                    self.errors.push(SchemaError::InvalidDefault {
                        name: name.to_owned(),
                        expected: kind.display_name(),
                    });
                    return self;
                }
            },
            None => None,
        };

        self.definitions.insert(
            name.to_owned(),
            ParameterDefinition {
                name: name.to_owned(),
                kind,
                required,
                default,
                description: description.to_owned(),
                aliases: Vec::new(),
            },
        );
        self
    }

    /// Finalizes the schema, failing on the first recorded problem.
    pub fn build(mut self) -> Result<SpellParameterSchema, SchemaError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let mut alias_to_primary = HashMap::with_capacity(self.aliases.len());
        for (alias, primary) in self.aliases {
            let target_known =
                self.definitions.contains_key(&primary) || GLOBAL_DEFINITIONS.contains_key(&primary);
            if !target_known {
                return Err(SchemaError::DanglingAlias {
                    alias,
                    target: primary,
                });
            }
            let collides = self.definitions.contains_key(&alias)
                || GLOBAL_DEFINITIONS.contains_key(&alias)
                || alias_to_primary.contains_key(&alias);
            if collides {
                return Err(SchemaError::DuplicateAlias(alias));
            }
            if let Some(definition) = self.definitions.get_mut(&primary) {
                definition.aliases.push(alias.clone());
            }
            alias_to_primary.insert(alias, primary);
        }

        Ok(SpellParameterSchema {
            definitions: self.definitions,
            alias_to_primary,
        })
    }
}
