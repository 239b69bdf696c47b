//! Loader for the file-defined spell parameter override table.
//!
//! The table maps spell ids to partial records:
//!
//! ```json
//! { "fireball": { "baseManaCost": 25, "cooldown": 4.5 } }
//! ```
//!
//! JSON, TOML and RON files are accepted; the format follows the extension.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use spell_core::{LoadError, ParameterRecord, ParameterSource, ParameterTable};

use super::{LoadResult, read_file};

/// Override table shipped with the crate.
const EMBEDDED_PARAMETERS: &str = include_str!("../../data/spell_parameters.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterFormat {
    Json,
    Toml,
    Ron,
}

impl ParameterFormat {
    /// Picks the format from a file extension. Unknown extensions read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => ParameterFormat::Toml,
            Some("ron") => ParameterFormat::Ron,
            _ => ParameterFormat::Json,
        }
    }
}

/// Loader for override tables.
pub struct ParameterTableLoader;

impl ParameterTableLoader {
    /// Load an override table from a file.
    pub fn load(path: &Path) -> LoadResult<ParameterTable> {
        let content = read_file(path)?;
        Self::parse(&content, ParameterFormat::from_path(path))
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    /// Parse an override table from text.
    pub fn parse(content: &str, format: ParameterFormat) -> LoadResult<ParameterTable> {
        let records: IndexMap<String, ParameterRecord> = match format {
            ParameterFormat::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse parameter JSON: {}", e))?,
            ParameterFormat::Toml => toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse parameter TOML: {}", e))?,
            ParameterFormat::Ron => ron::Options::default()
                .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
                .from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse parameter RON: {}", e))?,
        };
        Ok(records.into_iter().collect())
    }
}

/// Reads the override table from a file on first use.
#[derive(Clone, Debug)]
pub struct FileParameterSource {
    path: PathBuf,
}

impl FileParameterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParameterSource for FileParameterSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<ParameterTable, LoadError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound(self.describe()),
            _ => LoadError::Malformed {
                origin: self.describe(),
                message: e.to_string(),
            },
        })?;
        ParameterTableLoader::parse(&content, ParameterFormat::from_path(&self.path)).map_err(|e| {
            LoadError::Malformed {
                origin: self.describe(),
                message: e.to_string(),
            }
        })
    }
}

/// The table compiled into this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedParameterSource;

impl ParameterSource for EmbeddedParameterSource {
    fn describe(&self) -> String {
        "embedded spell_parameters.json".to_owned()
    }

    fn load(&self) -> Result<ParameterTable, LoadError> {
        ParameterTableLoader::parse(EMBEDDED_PARAMETERS, ParameterFormat::Json).map_err(|e| {
            LoadError::Malformed {
                origin: self.describe(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spell_core::ConfigField;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ParameterFormat::from_path(Path::new("a.toml")), ParameterFormat::Toml);
        assert_eq!(ParameterFormat::from_path(Path::new("a.RON")), ParameterFormat::Ron);
        assert_eq!(ParameterFormat::from_path(Path::new("a.json")), ParameterFormat::Json);
        assert_eq!(ParameterFormat::from_path(Path::new("noext")), ParameterFormat::Json);
    }

    #[test]
    fn parses_each_format() {
        let json = r#"{"heal": {"castTime": 0, "cooldown": 2.5}}"#;
        let toml = "[heal]\ncastTime = 0\ncooldown = 2.5\n";
        let ron = "{\"heal\": (castTime: 0, cooldown: 2.5)}";

        for (text, format) in [
            (json, ParameterFormat::Json),
            (toml, ParameterFormat::Toml),
            (ron, ParameterFormat::Ron),
        ] {
            let table = ParameterTableLoader::parse(text, format).unwrap();
            let heal = table.get("heal").unwrap();
            assert!(heal.defines(ConfigField::CastTime));
            assert!(heal.defines(ConfigField::Cooldown));
            assert!(!heal.defines(ConfigField::BaseManaCost));
            assert_eq!(heal.config.cooldown, 2.5);
        }
    }

    #[test]
    fn unknown_record_fields_are_ignored() {
        let json = r#"{"heal": {"manaCost": 3, "note": "tuned", "cooldown": 1.5}}"#;
        let table = ParameterTableLoader::parse(json, ParameterFormat::Json).unwrap();
        let heal = table.get("heal").unwrap();
        assert!(heal.defines(ConfigField::Cooldown));
        assert!(!heal.defines(ConfigField::BaseManaCost));
        assert_eq!(heal.config.cooldown, 1.5);
    }

    #[test]
    fn fractional_integer_keeps_the_rest_of_the_table() {
        let json = r#"{
            "fireball": {"castTime": 20.0, "note": "slower"},
            "blink": {"baseManaCost": 30}
        }"#;
        let toml = "[fireball]\ncastTime = 20.7\nnote = \"slower\"\n\n[blink]\nbaseManaCost = 30\n";

        for (text, format) in [(json, ParameterFormat::Json), (toml, ParameterFormat::Toml)] {
            let table = ParameterTableLoader::parse(text, format).unwrap();

            let fireball = table.get("fireball").unwrap();
            assert!(fireball.defines(ConfigField::CastTime));
            assert_eq!(fireball.config.cast_time, 20);

            let blink = table.get("blink").unwrap();
            assert!(blink.defines(ConfigField::BaseManaCost));
            assert_eq!(blink.config.base_mana_cost, 30);
        }
    }

    #[test]
    fn embedded_table_parses() {
        let table = EmbeddedParameterSource.load().unwrap();
        assert!(!table.is_empty());
        assert!(table.get("fireball").is_some());
    }
}
