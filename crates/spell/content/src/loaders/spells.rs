//! Spell catalog loader.

use std::path::Path;

use crate::spells::SpellDefinition;

use super::{LoadResult, read_file};

/// Catalog shipped with the crate.
const EMBEDDED_CATALOG: &str = include_str!("../../data/spells.ron");

/// Loader for spell catalogs written in RON.
pub struct SpellCatalogLoader;

impl SpellCatalogLoader {
    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<SpellDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    /// The catalog compiled into this crate.
    pub fn embedded() -> LoadResult<Vec<SpellDefinition>> {
        Self::parse(EMBEDDED_CATALOG)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SpellDefinition>> {
        let definitions: Vec<SpellDefinition> = ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        let mut seen = std::collections::HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.id.as_str()) {
                anyhow::bail!("Duplicate spell id in catalog: {}", definition.id);
            }
        }
        Ok(definitions)
    }
}
