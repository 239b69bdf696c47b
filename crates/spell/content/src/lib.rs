//! Spell content: data files, loaders, and catalog spells.
//!
//! This crate owns everything read from disk. `spell-core` stays free of I/O
//! and receives the results through [`spell_core::ParameterSource`] and
//! [`spell_core::SpellRegistry`].
//!
//! # Data files
//!
//! - `data/spell_parameters.json`: override table, embedded as
//!   [`EmbeddedParameterSource`]
//! - `data/spells.ron`: spell catalog, embedded via
//!   [`SpellCatalogLoader::embedded`]
//! - `data/server.toml`: sample server tuning for [`ServerConfigLoader`]
//!
//! # Example
//!
//! ```no_run
//! use spell_content::{EmbeddedParameterSource, SpellBook, SpellCatalogLoader, SpellServerConfig};
//! use spell_core::SpellParameterLoader;
//!
//! let loader = SpellParameterLoader::new(EmbeddedParameterSource);
//! let definitions = SpellCatalogLoader::embedded()?;
//! let book = SpellBook::from_definitions(definitions, &loader, &SpellServerConfig::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod loaders;
pub mod spells;

pub use loaders::{
    EmbeddedParameterSource, FileParameterSource, LoadResult, ParameterFormat,
    ParameterTableLoader, ServerConfigLoader, SpellCatalogLoader, SpellServerConfig, SpellTuning,
};
pub use spells::{CatalogSpell, EffectOutcome, EffectSpec, FieldSpec, SpellBook, SpellDefinition};
