//! Wires content loaders into a castable spell book.

use anyhow::{Context, Result};
use spell_content::{
    EmbeddedParameterSource, FileParameterSource, ServerConfigLoader, SpellBook,
    SpellCatalogLoader, SpellServerConfig,
};
use spell_core::{CasterState, SpellParameterLoader};
use uuid::Uuid;

use crate::config::CliConfig;

/// Everything one command needs: the override loader, tuning, and the book.
pub struct Session {
    pub loader: SpellParameterLoader,
    pub server: SpellServerConfig,
    pub book: SpellBook,
}

impl Session {
    pub fn open(config: &CliConfig) -> Result<Self> {
        let loader = match &config.parameters_path {
            Some(path) => SpellParameterLoader::new(FileParameterSource::new(path)),
            None => SpellParameterLoader::new(EmbeddedParameterSource),
        };

        let server = match &config.server_config_path {
            Some(path) => ServerConfigLoader::load(path)?,
            None => SpellServerConfig::default(),
        };

        let definitions = match &config.catalog_path {
            Some(path) => SpellCatalogLoader::load(path)?,
            None => SpellCatalogLoader::embedded()?,
        };

        let book = SpellBook::from_definitions(definitions, &loader, &server)
            .context("Failed to build spell book")?;
        tracing::debug!(spells = book.len(), "spell book ready");

        Ok(Self {
            loader,
            server,
            book,
        })
    }

    /// A fresh caster with server cooldown multipliers applied.
    pub fn caster(&self, mana: i32) -> CasterState {
        self.server
            .spells
            .iter()
            .filter(|(_, tuning)| tuning.cooldown_multiplier != 1.0)
            .fold(CasterState::new(Uuid::nil(), mana), |caster, (id, tuning)| {
                caster.with_cooldown_modifier(id.clone(), tuning.cooldown_multiplier)
            })
    }
}
