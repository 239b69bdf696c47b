use indexmap::IndexMap;
use spell_core::{SchemaError, Spell, SpellParameterLoader, SpellRegistry};

use super::{CatalogSpell, SpellDefinition};
use crate::loaders::SpellServerConfig;

/// Registry of catalog spells, in catalog order.
#[derive(Debug, Default)]
pub struct SpellBook {
    spells: IndexMap<String, CatalogSpell>,
}

impl SpellBook {
    /// Builds every definition against the override table and server tuning.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = SpellDefinition>,
        loader: &SpellParameterLoader,
        server: &SpellServerConfig,
    ) -> Result<Self, SchemaError> {
        let mut book = Self::default();
        for definition in definitions {
            let tuning = server.tuning(&definition.id);
            book.insert(CatalogSpell::new(definition, loader, tuning)?);
        }
        Ok(book)
    }

    /// Adds a spell, replacing any spell with the same id.
    pub fn insert(&mut self, spell: CatalogSpell) {
        self.spells.insert(spell.id().to_owned(), spell);
    }

    pub fn get(&self, id: &str) -> Option<&CatalogSpell> {
        self.spells.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CatalogSpell> {
        self.spells.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogSpell> {
        self.spells.values()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellRegistry for SpellBook {
    fn spell(&self, id: &str) -> Option<&dyn Spell> {
        self.spells.get(id).map(|spell| spell as &dyn Spell)
    }

    fn spell_mut(&mut self, id: &str) -> Option<&mut dyn Spell> {
        self.spells.get_mut(id).map(|spell| spell as &mut dyn Spell)
    }

    fn spell_ids(&self) -> Vec<&str> {
        self.spells.keys().map(String::as_str).collect()
    }
}
