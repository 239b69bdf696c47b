//! Lookup of castable spells by id.

use super::Spell;

pub trait SpellRegistry {
    fn spell(&self, id: &str) -> Option<&dyn Spell>;

    fn spell_mut(&mut self, id: &str) -> Option<&mut dyn Spell>;

    /// Registered ids in registration order.
    fn spell_ids(&self) -> Vec<&str>;
}
