//! Content loaders for reading spell data from files.
//!
//! This module provides loaders that convert JSON/TOML/RON files into the
//! tables and catalogs consumed by `spell-core`.

pub mod config;
pub mod parameters;
pub mod spells;

pub use config::{ServerConfigLoader, SpellServerConfig, SpellTuning};
pub use parameters::{
    EmbeddedParameterSource, FileParameterSource, ParameterFormat, ParameterTableLoader,
};
pub use spells::SpellCatalogLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
