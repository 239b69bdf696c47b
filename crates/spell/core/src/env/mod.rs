//! Traits describing the collaborators a cast touches.
//!
//! Concrete spells, casters, and notification transports live outside this
//! crate. The orchestrator only sees them through the traits below, plus the
//! in-memory [`CasterState`] and [`RecordingObserver`] used by tools and tests.
mod caster;
mod error;
mod observer;
mod registry;
mod spell;

pub use caster::{ActiveCast, Caster, CasterState};
pub use error::EffectError;
pub use observer::{Audience, CastEvent, CastObserver, NullObserver, RecordingObserver};
pub use registry::SpellRegistry;
pub use spell::{CastCheck, CastContext, ParameterizedSpell, Spell};
