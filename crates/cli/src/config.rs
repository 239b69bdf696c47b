//! CLI runtime configuration.
use std::env;
use std::path::PathBuf;

/// Starting mana of the demo caster when `SPELL_CASTER_MANA` is unset.
pub const DEFAULT_CASTER_MANA: i32 = 100;

/// Configuration read from the process environment.
#[derive(Clone, Debug, PartialEq)]
pub struct CliConfig {
    /// Override table file; the embedded table is used when unset.
    pub parameters_path: Option<PathBuf>,
    /// Spell catalog file; the embedded catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Server tuning file (TOML).
    pub server_config_path: Option<PathBuf>,
    pub caster_mana: i32,
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            parameters_path: None,
            catalog_path: None,
            server_config_path: None,
            caster_mana: DEFAULT_CASTER_MANA,
            log_dir: None,
            session_id: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SPELL_PARAMETERS_PATH` - Override table (JSON/TOML/RON, default: embedded)
    /// - `SPELL_CATALOG_PATH` - Spell catalog RON (default: embedded)
    /// - `SPELL_SERVER_CONFIG` - Server tuning TOML (default: none)
    /// - `SPELL_CASTER_MANA` - Starting mana of the caster (default: 100)
    /// - `SPELL_LOG_DIR` - Log directory (default: platform cache dir)
    /// - `SPELL_SESSION_ID` - Session identifier for log files (default: timestamp)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let mut config = Self {
            parameters_path: path("SPELL_PARAMETERS_PATH"),
            catalog_path: path("SPELL_CATALOG_PATH"),
            server_config_path: path("SPELL_SERVER_CONFIG"),
            log_dir: path("SPELL_LOG_DIR"),
            session_id: lookup("SPELL_SESSION_ID").filter(|v| !v.is_empty()),
            ..Self::default()
        };

        if let Some(mana) = lookup("SPELL_CASTER_MANA").and_then(|v| v.trim().parse::<i32>().ok()) {
            config.caster_mana = mana.max(0);
        }

        config
    }
}
