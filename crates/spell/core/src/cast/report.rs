use crate::config::SpellParameterConfig;
use crate::options::CastOptions;

/// Outcome of a successful orchestrated cast.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastReport {
    pub spell_id: String,
    pub level: u32,
    /// Effective configuration the cast ran with. Zeroed for fallback casts.
    pub config: SpellParameterConfig,
    pub options: CastOptions,
    /// Mana cost computed, if mana consumption was enabled.
    pub mana_cost: Option<i32>,
    /// Cooldown recorded, if cooldowns were enabled.
    pub cooldown_ticks: Option<i32>,
    pub cast_bar_started: bool,
    /// The spell took its fixed, non-parameterized path.
    pub fallback: bool,
    pub message: String,
}
