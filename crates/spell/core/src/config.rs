//! Numeric spell configuration and the layered resolver that produces it.
//!
//! Three layers contribute to the effective configuration of one cast, merged
//! field by field in this order of precedence:
//!
//! 1. runtime overrides supplied with the cast,
//! 2. the file-defined table, but only for fields the record actually names,
//! 3. the defaults compiled into the spell.
//!
//! The file table is read through a [`ParameterSource`] at most once per
//! [`SpellParameterLoader`] and cached for its lifetime.

use bitflags::bitflags;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use strum::IntoEnumIterator;
use tracing::{debug, error, info, warn};

use crate::error::{ErrorSeverity, SpellError};
use crate::params::{ParameterType, SpellParameters, TypedValue};

/// Cooldowns are configured in seconds and applied in ticks.
pub const TICKS_PER_SECOND: i32 = 20;

/// Effective numeric configuration of a spell for one cast.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellParameterConfig {
    pub base_mana_cost: i32,
    pub mana_cost_per_level: i32,
    pub base_spell_power: i32,
    pub spell_power_per_level: i32,
    /// Cast duration in ticks.
    pub cast_time: i32,
    /// Cooldown in seconds.
    pub cooldown: f64,
}

impl SpellParameterConfig {
    /// All-zero configuration, returned for spells without a file record.
    pub const DEFAULT: Self = Self {
        base_mana_cost: 0,
        mana_cost_per_level: 0,
        base_spell_power: 0,
        spell_power_per_level: 0,
        cast_time: 0,
        cooldown: 0.0,
    };

    pub fn value(&self, field: ConfigField) -> TypedValue {
        match field {
            ConfigField::BaseManaCost => TypedValue::Int(self.base_mana_cost),
            ConfigField::ManaCostPerLevel => TypedValue::Int(self.mana_cost_per_level),
            ConfigField::BaseSpellPower => TypedValue::Int(self.base_spell_power),
            ConfigField::SpellPowerPerLevel => TypedValue::Int(self.spell_power_per_level),
            ConfigField::CastTime => TypedValue::Int(self.cast_time),
            ConfigField::Cooldown => TypedValue::Double(self.cooldown),
        }
    }

    /// Copies one field from `other`.
    fn take_field(&mut self, field: ConfigField, other: &Self) {
        match field {
            ConfigField::BaseManaCost => self.base_mana_cost = other.base_mana_cost,
            ConfigField::ManaCostPerLevel => self.mana_cost_per_level = other.mana_cost_per_level,
            ConfigField::BaseSpellPower => self.base_spell_power = other.base_spell_power,
            ConfigField::SpellPowerPerLevel => {
                self.spell_power_per_level = other.spell_power_per_level
            }
            ConfigField::CastTime => self.cast_time = other.cast_time,
            ConfigField::Cooldown => self.cooldown = other.cooldown,
        }
    }

    /// Returns a copy with every field named in `params` replaced.
    ///
    /// Integer fields accept any numeric value (truncated); absent or
    /// non-numeric entries leave the field untouched.
    pub fn with_overrides(&self, params: &SpellParameters) -> Self {
        let mut config = *self;
        config.base_mana_cost =
            params.get_int(ConfigField::BaseManaCost.key(), config.base_mana_cost);
        config.mana_cost_per_level =
            params.get_int(ConfigField::ManaCostPerLevel.key(), config.mana_cost_per_level);
        config.base_spell_power =
            params.get_int(ConfigField::BaseSpellPower.key(), config.base_spell_power);
        config.spell_power_per_level = params.get_int(
            ConfigField::SpellPowerPerLevel.key(),
            config.spell_power_per_level,
        );
        config.cast_time = params.get_int(ConfigField::CastTime.key(), config.cast_time);
        config.cooldown = params.get_double(ConfigField::Cooldown.key(), config.cooldown);
        config
    }

    /// Cooldown converted to ticks, rounded to the nearest tick.
    pub fn cooldown_ticks(&self) -> i32 {
        (self.cooldown * TICKS_PER_SECOND as f64).round() as i32
    }

    /// Spell power at `level`: `base + per_level * (level - 1)`.
    pub fn spell_power(&self, level: u32) -> i32 {
        let steps = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        self.base_spell_power
            .saturating_add(self.spell_power_per_level.saturating_mul(steps))
    }
}

impl Default for SpellParameterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The six configuration fields, keyed as they appear in files and overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ConfigField {
    BaseManaCost,
    ManaCostPerLevel,
    BaseSpellPower,
    SpellPowerPerLevel,
    CastTime,
    Cooldown,
}

impl ConfigField {
    /// Canonical key in parameter containers and override files.
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub const fn kind(self) -> ParameterType {
        match self {
            ConfigField::Cooldown => ParameterType::Double,
            _ => ParameterType::Int,
        }
    }

    /// Conventional short alias accepted by the standard schema.
    pub const fn alias(self) -> Option<&'static str> {
        match self {
            ConfigField::BaseManaCost => Some("manaCost"),
            ConfigField::BaseSpellPower => Some("power"),
            ConfigField::SpellPowerPerLevel => Some("levelScaling"),
            _ => None,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ConfigField::BaseManaCost => "Base mana cost",
            ConfigField::ManaCostPerLevel => "Additional mana cost per level above 1",
            ConfigField::BaseSpellPower => "Base spell power",
            ConfigField::SpellPowerPerLevel => "Additional spell power per level above 1",
            ConfigField::CastTime => "Cast time in ticks",
            ConfigField::Cooldown => "Cooldown in seconds",
        }
    }

    pub const fn flag(self) -> ConfigFields {
        match self {
            ConfigField::BaseManaCost => ConfigFields::BASE_MANA_COST,
            ConfigField::ManaCostPerLevel => ConfigFields::MANA_COST_PER_LEVEL,
            ConfigField::BaseSpellPower => ConfigFields::BASE_SPELL_POWER,
            ConfigField::SpellPowerPerLevel => ConfigFields::SPELL_POWER_PER_LEVEL,
            ConfigField::CastTime => ConfigFields::CAST_TIME,
            ConfigField::Cooldown => ConfigFields::COOLDOWN,
        }
    }
}

bitflags! {
    /// Which configuration fields a file record explicitly defines.
    ///
    /// Presence is recorded while parsing, so a file value equal to the code
    /// default still counts as defined.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ConfigFields: u8 {
        const BASE_MANA_COST        = 1 << 0;
        const MANA_COST_PER_LEVEL   = 1 << 1;
        const BASE_SPELL_POWER      = 1 << 2;
        const SPELL_POWER_PER_LEVEL = 1 << 3;
        const CAST_TIME             = 1 << 4;
        const COOLDOWN              = 1 << 5;
    }
}

/// One partial record of the override file, as written on disk.
///
/// Integer fields accept any number and truncate it. Keys other than the six
/// configuration fields are ignored, so one odd record never costs the other
/// spells their overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ParameterRecord {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::truncated_int"))]
    pub base_mana_cost: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::truncated_int"))]
    pub mana_cost_per_level: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::truncated_int"))]
    pub base_spell_power: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::truncated_int"))]
    pub spell_power_per_level: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::truncated_int"))]
    pub cast_time: Option<i32>,
    pub cooldown: Option<f64>,
}

#[cfg(feature = "serde")]
mod lenient {
    use core::fmt;

    use serde::de::{self, Deserialize, Deserializer, Visitor};

    /// An integer written as any number; fractions truncate, out-of-range saturates.
    struct TruncatedInt(i32);

    impl<'de> Deserialize<'de> for TruncatedInt {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct NumberVisitor;

            impl Visitor<'_> for NumberVisitor {
                type Value = TruncatedInt;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a number")
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                    Ok(TruncatedInt(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                    Ok(TruncatedInt(v.min(i32::MAX as u64) as i32))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                    Ok(TruncatedInt(v as i32))
                }
            }

            deserializer.deserialize_any(NumberVisitor)
        }
    }

    pub(super) fn truncated_int<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i32>, D::Error> {
        Ok(Option::<TruncatedInt>::deserialize(deserializer)?.map(|n| n.0))
    }
}

/// A file record after parsing: values plus the set of fields it defined.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadedConfig {
    pub config: SpellParameterConfig,
    pub present: ConfigFields,
}

impl LoadedConfig {
    pub fn defines(&self, field: ConfigField) -> bool {
        self.present.contains(field.flag())
    }

    /// Field-wise merge: file values where defined, `code_defaults` elsewhere.
    pub fn merge_with_fallback(&self, code_defaults: &SpellParameterConfig) -> SpellParameterConfig {
        let mut merged = *code_defaults;
        for field in ConfigField::iter().filter(|f| self.defines(*f)) {
            merged.take_field(field, &self.config);
        }
        merged
    }
}

impl From<ParameterRecord> for LoadedConfig {
    fn from(record: ParameterRecord) -> Self {
        let mut loaded = LoadedConfig::default();
        let mut mark = |field: ConfigField, present: bool| {
            if present {
                loaded.present.insert(field.flag());
            }
        };
        mark(ConfigField::BaseManaCost, record.base_mana_cost.is_some());
        mark(ConfigField::ManaCostPerLevel, record.mana_cost_per_level.is_some());
        mark(ConfigField::BaseSpellPower, record.base_spell_power.is_some());
        mark(ConfigField::SpellPowerPerLevel, record.spell_power_per_level.is_some());
        mark(ConfigField::CastTime, record.cast_time.is_some());
        mark(ConfigField::Cooldown, record.cooldown.is_some());

        loaded.config = SpellParameterConfig {
            base_mana_cost: record.base_mana_cost.unwrap_or_default(),
            mana_cost_per_level: record.mana_cost_per_level.unwrap_or_default(),
            base_spell_power: record.base_spell_power.unwrap_or_default(),
            spell_power_per_level: record.spell_power_per_level.unwrap_or_default(),
            cast_time: record.cast_time.unwrap_or_default(),
            cooldown: record.cooldown.unwrap_or_default(),
        };
        loaded
    }
}

/// File-defined override table, keyed by spell id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterTable {
    records: IndexMap<String, LoadedConfig>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spell_id: impl Into<String>, record: impl Into<LoadedConfig>) {
        self.records.insert(spell_id.into(), record.into());
    }

    pub fn get(&self, spell_id: &str) -> Option<&LoadedConfig> {
        self.records.get(spell_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn spell_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, ParameterRecord)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (K, ParameterRecord)>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .map(|(id, record)| (id.into(), LoadedConfig::from(record)))
                .collect(),
        }
    }
}

/// Failure to read the file-defined table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("override table not found: {0}")]
    NotFound(String),

    #[error("override table {origin} is malformed: {message}")]
    Malformed { origin: String, message: String },
}

impl SpellError for LoadError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            LoadError::NotFound(_) => ErrorSeverity::Recoverable,
            LoadError::Malformed { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LoadError::NotFound(_) => "LOAD_NOT_FOUND",
            LoadError::Malformed { .. } => "LOAD_MALFORMED",
        }
    }
}

/// Where the file-defined table comes from.
pub trait ParameterSource: Send + Sync {
    /// Human-readable origin for log messages.
    fn describe(&self) -> String;

    fn load(&self) -> Result<ParameterTable, LoadError>;
}

/// Source with no records; every resolve falls through to code defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoParameterSource;

impl ParameterSource for NoParameterSource {
    fn describe(&self) -> String {
        "none".to_owned()
    }

    fn load(&self) -> Result<ParameterTable, LoadError> {
        Ok(ParameterTable::new())
    }
}

/// Owns the file-defined table and merges it with code and runtime layers.
///
/// Construct one at startup and pass it by reference to whatever resolves
/// configurations. The table is read lazily on first use, exactly once.
pub struct SpellParameterLoader {
    source: Box<dyn ParameterSource>,
    table: OnceCell<ParameterTable>,
}

impl SpellParameterLoader {
    pub fn new(source: impl ParameterSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            table: OnceCell::new(),
        }
    }

    /// Loader over an already-built table; no source is consulted.
    pub fn from_table(table: ParameterTable) -> Self {
        Self {
            source: Box::new(NoParameterSource),
            table: OnceCell::with_value(table),
        }
    }

    pub fn empty() -> Self {
        Self::from_table(ParameterTable::new())
    }

    /// Loads the table if it has not been loaded yet.
    ///
    /// Load failures never propagate: a missing or malformed source yields an
    /// empty table and the condition is logged.
    pub fn load_once(&self) -> &ParameterTable {
        self.table.get_or_init(|| {
            let origin = self.source.describe();
            match self.source.load() {
                Ok(table) => {
                    info!(origin = %origin, records = table.len(), "loaded spell parameter overrides");
                    table
                }
                Err(err @ LoadError::NotFound(_)) => {
                    warn!(error = %err, "no spell parameter overrides, using code defaults");
                    ParameterTable::new()
                }
                Err(err) => {
                    error!(error = %err, code = err.error_code(), "ignoring spell parameter overrides");
                    ParameterTable::new()
                }
            }
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// File configuration for `spell_id`, or all zeros if it has none.
    pub fn get(&self, spell_id: &str) -> SpellParameterConfig {
        self.load_once()
            .get(spell_id)
            .map(|loaded| loaded.config)
            .unwrap_or(SpellParameterConfig::DEFAULT)
    }

    pub fn has_config(&self, spell_id: &str) -> bool {
        self.load_once().get(spell_id).is_some()
    }

    /// Merges the three layers into one effective configuration.
    pub fn resolve(
        &self,
        spell_id: &str,
        runtime: &SpellParameters,
        code_defaults: &SpellParameterConfig,
    ) -> SpellParameterConfig {
        let layered = match self.load_once().get(spell_id) {
            Some(loaded) => loaded.merge_with_fallback(code_defaults),
            None => *code_defaults,
        };
        let resolved = layered.with_overrides(runtime);
        debug!(spell = spell_id, ?resolved, "resolved spell configuration");
        resolved
    }
}

impl core::fmt::Debug for SpellParameterLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpellParameterLoader")
            .field("source", &self.source.describe())
            .field("table", &self.table.get())
            .finish()
    }
}
