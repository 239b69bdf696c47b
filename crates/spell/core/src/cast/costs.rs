//! Mana and cooldown derivation.

use crate::config::SpellParameterConfig;

/// Mana cost at `level`: `(base + per_level * (level - 1)) * multiplier`,
/// truncated toward zero. Level 0 costs the same as level 1.
pub fn mana_cost(config: &SpellParameterConfig, level: u32, multiplier: f64) -> i32 {
    let steps = f64::from(level.saturating_sub(1));
    let raw = f64::from(config.base_mana_cost) + f64::from(config.mana_cost_per_level) * steps;
    (raw * multiplier) as i32
}

/// Cooldown to record, in ticks.
///
/// * `resolved_ticks <= 0`: the caster's live cooldown is used unchanged.
/// * both `default_ticks` and `live_ticks` positive: the resolved value is
///   scaled by the same ratio the caster's modifiers apply to the default,
///   with a floor of one tick.
/// * otherwise: `resolved_ticks` as is.
pub fn resolve_cooldown_ticks(resolved_ticks: i32, default_ticks: i32, live_ticks: i32) -> i32 {
    if resolved_ticks <= 0 {
        live_ticks
    } else if default_ticks > 0 && live_ticks > 0 {
        let scaled = f64::from(resolved_ticks) / f64::from(default_ticks) * f64::from(live_ticks);
        (scaled.round() as i32).max(1)
    } else {
        resolved_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: i32, per_level: i32) -> SpellParameterConfig {
        SpellParameterConfig {
            base_mana_cost: base,
            mana_cost_per_level: per_level,
            ..SpellParameterConfig::DEFAULT
        }
    }

    #[test]
    fn mana_cost_scales_with_level_above_one() {
        assert_eq!(mana_cost(&config(20, 5), 1, 1.0), 20);
        assert_eq!(mana_cost(&config(20, 5), 3, 1.0), 30);
        assert_eq!(mana_cost(&config(20, 5), 0, 1.0), 20);
    }

    #[test]
    fn mana_cost_truncates_after_multiplier() {
        assert_eq!(mana_cost(&config(15, 0), 1, 0.5), 7);
        assert_eq!(mana_cost(&config(-15, 0), 1, 0.5), -7);
    }

    #[test]
    fn zero_resolved_cooldown_keeps_live_ticks() {
        assert_eq!(resolve_cooldown_ticks(0, 200, 137), 137);
        assert_eq!(resolve_cooldown_ticks(-20, 200, 137), 137);
    }

    #[test]
    fn cooldown_preserves_modifier_ratio() {
        // 5 s override, 200 tick default halved to 100 then quartered to 50.
        assert_eq!(resolve_cooldown_ticks(100, 200, 50), 25);
        assert_eq!(resolve_cooldown_ticks(200, 200, 100), 100);
        assert_eq!(resolve_cooldown_ticks(1, 200, 50), 1);
    }

    #[test]
    fn cooldown_without_default_uses_resolved() {
        assert_eq!(resolve_cooldown_ticks(60, 0, 0), 60);
        assert_eq!(resolve_cooldown_ticks(60, 200, 0), 60);
    }
}
