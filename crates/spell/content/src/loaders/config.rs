//! Server tuning loader.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{LoadResult, read_file};

/// Per-spell tuning applied by the server on top of spell configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellTuning {
    /// Scale applied to computed mana costs.
    #[serde(default = "default_multiplier")]
    pub mana_multiplier: f64,
    /// Scale applied to cooldowns by the caster (1.0 leaves them unchanged).
    #[serde(default = "default_multiplier")]
    pub cooldown_multiplier: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

impl Default for SpellTuning {
    fn default() -> Self {
        Self {
            mana_multiplier: default_multiplier(),
            cooldown_multiplier: default_multiplier(),
            enabled: default_enabled(),
        }
    }
}

/// Server tuning table.
///
/// ```toml
/// [spells.fireball]
/// mana_multiplier = 1.5
///
/// [spells.blink]
/// enabled = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellServerConfig {
    #[serde(default)]
    pub spells: IndexMap<String, SpellTuning>,
}

impl SpellServerConfig {
    /// Tuning for `spell_id`, or the neutral tuning if none is configured.
    pub fn tuning(&self, spell_id: &str) -> SpellTuning {
        self.spells.get(spell_id).copied().unwrap_or_default()
    }
}

/// Loader for server tuning files.
pub struct ServerConfigLoader;

impl ServerConfigLoader {
    /// Load tuning from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SpellServerConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<SpellServerConfig> {
        let config: SpellServerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse server TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_neutral_defaults() {
        let config = ServerConfigLoader::parse(
            "[spells.fireball]\nmana_multiplier = 1.5\n\n[spells.blink]\nenabled = false\n",
        )
        .unwrap();

        let fireball = config.tuning("fireball");
        assert_eq!(fireball.mana_multiplier, 1.5);
        assert_eq!(fireball.cooldown_multiplier, 1.0);
        assert!(fireball.enabled);

        assert!(!config.tuning("blink").enabled);
        assert_eq!(config.tuning("unknown"), SpellTuning::default());
    }

    #[test]
    fn empty_file_is_valid() {
        assert!(ServerConfigLoader::parse("").unwrap().spells.is_empty());
    }
}
