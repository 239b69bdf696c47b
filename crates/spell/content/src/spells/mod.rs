//! Catalog-driven spells.
//!
//! A catalog entry ([`SpellDefinition`]) declares a spell's code defaults,
//! its extra schema fields, and the effect it resolves. [`CatalogSpell`] turns
//! an entry into a castable spell and [`SpellBook`] registers them by id.

mod book;
mod catalog;
mod definition;

pub use book::SpellBook;
pub use catalog::{CatalogSpell, EffectOutcome};
pub use definition::{EffectSpec, FieldSpec, SpellDefinition};
