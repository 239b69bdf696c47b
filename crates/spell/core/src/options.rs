//! Cast options: the five per-cast behavior flags.
//!
//! Defaults come from the [`CastSource`] that triggered the cast. Each flag can
//! then be overridden individually by a same-named boolean parameter.

use bitflags::bitflags;
use strum::IntoEnumIterator;

use crate::params::SpellParameters;

/// Channel through which a cast was triggered.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CastSource {
    Spellbook,
    Scroll,
    Sword,
    #[default]
    Command,
    Mob,
    None,
}

impl CastSource {
    /// Fixed option defaults for this source.
    pub const fn default_options(self) -> CastOptions {
        match self {
            CastSource::Spellbook | CastSource::Sword => CastOptions::CONSUME_MANA
                .union(CastOptions::TRIGGER_COOLDOWN)
                .union(CastOptions::PLAY_EFFECTS)
                .union(CastOptions::SHOW_CAST_BAR),
            CastSource::Scroll | CastSource::Mob => CastOptions::PLAY_EFFECTS,
            CastSource::Command => CastOptions::PLAY_EFFECTS.union(CastOptions::BYPASS_CONDITIONS),
            CastSource::None => CastOptions::empty(),
        }
    }
}

bitflags! {
    /// Behavior flags for one cast.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CastOptions: u8 {
        const CONSUME_MANA      = 1 << 0;
        const TRIGGER_COOLDOWN  = 1 << 1;
        const PLAY_EFFECTS      = 1 << 2;
        const BYPASS_CONDITIONS = 1 << 3;
        const SHOW_CAST_BAR     = 1 << 4;
    }
}

impl CastOptions {
    pub const fn from_source(source: CastSource) -> Self {
        source.default_options()
    }

    /// Source defaults with per-flag overrides from `params`.
    ///
    /// Only boolean entries count; anything else keeps the source default.
    pub fn from_parameters(source: CastSource, params: &SpellParameters) -> Self {
        Self::from_source(source).with_overrides(params)
    }

    #[must_use]
    pub fn with_overrides(mut self, params: &SpellParameters) -> Self {
        for flag in CastFlag::iter() {
            if let Some(enabled) = params.try_get::<bool>(flag.key()) {
                self.set(flag.bit(), enabled);
            }
        }
        self
    }

    pub fn builder() -> CastOptionsBuilder {
        CastOptionsBuilder::default()
    }

    pub const fn consume_mana(self) -> bool {
        self.contains(Self::CONSUME_MANA)
    }

    pub const fn trigger_cooldown(self) -> bool {
        self.contains(Self::TRIGGER_COOLDOWN)
    }

    pub const fn play_effects(self) -> bool {
        self.contains(Self::PLAY_EFFECTS)
    }

    pub const fn bypass_conditions(self) -> bool {
        self.contains(Self::BYPASS_CONDITIONS)
    }

    pub const fn show_cast_bar(self) -> bool {
        self.contains(Self::SHOW_CAST_BAR)
    }
}

/// Hand-assembled [`CastOptions`]; starts with only `play_effects` set.
#[derive(Clone, Copy, Debug)]
pub struct CastOptionsBuilder {
    options: CastOptions,
}

impl Default for CastOptionsBuilder {
    fn default() -> Self {
        Self {
            options: CastOptions::PLAY_EFFECTS,
        }
    }
}

impl CastOptionsBuilder {
    pub fn consume_mana(mut self, enabled: bool) -> Self {
        self.options.set(CastOptions::CONSUME_MANA, enabled);
        self
    }

    pub fn trigger_cooldown(mut self, enabled: bool) -> Self {
        self.options.set(CastOptions::TRIGGER_COOLDOWN, enabled);
        self
    }

    pub fn play_effects(mut self, enabled: bool) -> Self {
        self.options.set(CastOptions::PLAY_EFFECTS, enabled);
        self
    }

    pub fn bypass_conditions(mut self, enabled: bool) -> Self {
        self.options.set(CastOptions::BYPASS_CONDITIONS, enabled);
        self
    }

    pub fn show_cast_bar(mut self, enabled: bool) -> Self {
        self.options.set(CastOptions::SHOW_CAST_BAR, enabled);
        self
    }

    pub fn build(self) -> CastOptions {
        self.options
    }
}

/// One cast-option flag, as a parameter key every schema accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum CastFlag {
    ConsumeMana,
    TriggerCooldown,
    PlayEffects,
    BypassConditions,
    ShowCastBar,
}

impl CastFlag {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub const fn bit(self) -> CastOptions {
        match self {
            CastFlag::ConsumeMana => CastOptions::CONSUME_MANA,
            CastFlag::TriggerCooldown => CastOptions::TRIGGER_COOLDOWN,
            CastFlag::PlayEffects => CastOptions::PLAY_EFFECTS,
            CastFlag::BypassConditions => CastOptions::BYPASS_CONDITIONS,
            CastFlag::ShowCastBar => CastOptions::SHOW_CAST_BAR,
        }
    }

    /// Documented default in schema usage; never filled in by validation.
    pub const fn schema_default(self) -> bool {
        matches!(
            self,
            CastFlag::TriggerCooldown | CastFlag::PlayEffects
        )
    }

    pub const fn description(self) -> &'static str {
        match self {
            CastFlag::ConsumeMana => "Whether to consume mana",
            CastFlag::TriggerCooldown => "Whether to trigger the cooldown",
            CastFlag::PlayEffects => "Whether to play cast effects",
            CastFlag::BypassConditions => "Whether to skip cast conditions",
            CastFlag::ShowCastBar => "Whether to show the cast bar",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(options: CastOptions) -> [bool; 5] {
        [
            options.consume_mana(),
            options.trigger_cooldown(),
            options.play_effects(),
            options.bypass_conditions(),
            options.show_cast_bar(),
        ]
    }

    #[test]
    fn source_table() {
        let t = true;
        let f = false;
        assert_eq!(flags(CastOptions::from_source(CastSource::Spellbook)), [t, t, t, f, t]);
        assert_eq!(flags(CastOptions::from_source(CastSource::Scroll)), [f, f, t, f, f]);
        assert_eq!(flags(CastOptions::from_source(CastSource::Sword)), [t, t, t, f, t]);
        assert_eq!(flags(CastOptions::from_source(CastSource::Command)), [f, f, t, t, f]);
        assert_eq!(flags(CastOptions::from_source(CastSource::Mob)), [f, f, t, f, f]);
        assert_eq!(flags(CastOptions::from_source(CastSource::None)), [f, f, f, f, f]);
    }

    #[test]
    fn boolean_parameters_override_individual_flags() {
        let params = SpellParameters::empty()
            .with("consumeMana", true)
            .with("playEffects", false)
            .with("showCastBar", 1);
        let options = CastOptions::from_parameters(CastSource::Command, &params);
        assert_eq!(flags(options), [true, false, false, true, false]);
    }

    #[test]
    fn builder_defaults() {
        assert_eq!(flags(CastOptions::builder().build()), [false, false, true, false, false]);
        let options = CastOptions::builder()
            .consume_mana(true)
            .play_effects(false)
            .build();
        assert_eq!(flags(options), [true, false, false, false, false]);
    }

    #[test]
    fn sources_parse_from_names() {
        assert_eq!("spellbook".parse::<CastSource>().unwrap(), CastSource::Spellbook);
        assert_eq!("MOB".parse::<CastSource>().unwrap(), CastSource::Mob);
        assert_eq!(CastFlag::ShowCastBar.key(), "showCastBar");
    }
}
