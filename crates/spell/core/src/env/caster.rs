//! The actor a cast runs on behalf of.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::options::CastSource;

/// Mana pool, casting state, and cooldown ledger of a caster.
pub trait Caster {
    fn id(&self) -> Uuid;

    fn mana(&self) -> i32;

    fn set_mana(&mut self, mana: i32);

    /// True while a multi-tick cast is in progress.
    fn is_casting(&self) -> bool;

    /// Starts a multi-tick cast of `duration` ticks.
    fn initiate_cast(&mut self, spell_id: &str, level: u32, duration: i32, source: CastSource);

    /// Cancels any in-progress cast.
    fn reset_casting_state(&mut self);

    fn add_cooldown(&mut self, spell_id: &str, ticks: i32);

    /// `base_ticks` after whatever modifiers currently affect this caster.
    fn effective_cooldown(&self, spell_id: &str, base_ticks: i32) -> i32 {
        let _ = spell_id;
        base_ticks
    }
}

/// A cast in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveCast {
    pub spell_id: String,
    pub level: u32,
    pub duration: i32,
    pub source: CastSource,
}

/// In-memory [`Caster`].
///
/// Cooldown modifiers scale a spell's base cooldown, e.g. `0.5` halves it.
#[derive(Clone, Debug, PartialEq)]
pub struct CasterState {
    id: Uuid,
    mana: i32,
    casting: Option<ActiveCast>,
    cooldowns: IndexMap<String, i32>,
    cooldown_modifiers: IndexMap<String, f64>,
}

impl CasterState {
    pub fn new(id: Uuid, mana: i32) -> Self {
        Self {
            id,
            mana,
            casting: None,
            cooldowns: IndexMap::new(),
            cooldown_modifiers: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_cooldown_modifier(mut self, spell_id: impl Into<String>, factor: f64) -> Self {
        self.cooldown_modifiers.insert(spell_id.into(), factor);
        self
    }

    pub fn active_cast(&self) -> Option<&ActiveCast> {
        self.casting.as_ref()
    }

    /// Remaining cooldown ticks for `spell_id`, if any were recorded.
    pub fn cooldown(&self, spell_id: &str) -> Option<i32> {
        self.cooldowns.get(spell_id).copied()
    }

    pub fn cooldowns(&self) -> impl Iterator<Item = (&str, i32)> {
        self.cooldowns.iter().map(|(id, ticks)| (id.as_str(), *ticks))
    }
}

impl Caster for CasterState {
    fn id(&self) -> Uuid {
        self.id
    }

    fn mana(&self) -> i32 {
        self.mana
    }

    fn set_mana(&mut self, mana: i32) {
        self.mana = mana;
    }

    fn is_casting(&self) -> bool {
        self.casting.is_some()
    }

    fn initiate_cast(&mut self, spell_id: &str, level: u32, duration: i32, source: CastSource) {
        self.casting = Some(ActiveCast {
            spell_id: spell_id.to_owned(),
            level,
            duration,
            source,
        });
    }

    fn reset_casting_state(&mut self) {
        self.casting = None;
    }

    fn add_cooldown(&mut self, spell_id: &str, ticks: i32) {
        self.cooldowns.insert(spell_id.to_owned(), ticks);
    }

    fn effective_cooldown(&self, spell_id: &str, base_ticks: i32) -> i32 {
        match self.cooldown_modifiers.get(spell_id) {
            Some(factor) => (base_ticks as f64 * factor).round() as i32,
            None => base_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_modifiers_apply_per_spell() {
        let caster = CasterState::new(Uuid::nil(), 100).with_cooldown_modifier("blink", 0.25);
        assert_eq!(caster.effective_cooldown("blink", 200), 50);
        assert_eq!(caster.effective_cooldown("heal", 200), 200);
    }

    #[test]
    fn casting_state_round_trip() {
        let mut caster = CasterState::new(Uuid::nil(), 10);
        assert!(!caster.is_casting());
        caster.initiate_cast("heal", 2, 40, CastSource::Command);
        assert_eq!(caster.active_cast().map(|c| c.duration), Some(40));
        caster.reset_casting_state();
        assert!(caster.active_cast().is_none());
    }
}
