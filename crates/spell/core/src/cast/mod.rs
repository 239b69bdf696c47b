//! Cast orchestration.
//!
//! [`SpellCastManager`] drives a cast through its phases (see [`CastPhase`]).
//! The spell's configuration is swapped in through a [`ParameterGuard`], so
//! no exit path leaks an override into later casts.
mod costs;
mod error;
mod guard;
mod manager;
mod phase;
mod report;

pub use costs::{mana_cost, resolve_cooldown_ticks};
pub use error::CastError;
pub use guard::ParameterGuard;
pub use manager::SpellCastManager;
pub use phase::CastPhase;
pub use report::CastReport;
