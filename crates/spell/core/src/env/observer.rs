//! Notifications the orchestrator emits while a cast runs.
//!
//! The core only decides whether and when to emit. Delivering an event to a
//! client, or to everyone near the caster, is the observer's job.

use uuid::Uuid;

use crate::options::CastSource;
use crate::params::TagCompound;

/// Who an event is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Audience {
    /// Only the invoking caster.
    Caster,
    /// The caster and every observer tracking it.
    Tracking,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CastEvent {
    CastStarted {
        caster: Uuid,
        spell_id: String,
        level: u32,
        duration: i32,
    },
    CastFinished {
        caster: Uuid,
        spell_id: String,
        interrupted: bool,
    },
    ManaChanged {
        caster: Uuid,
        mana: i32,
    },
    /// Replays cast visuals; `data` is the normalized parameter set in the
    /// binary tag format.
    EffectReplay {
        spell_id: String,
        level: u32,
        source: CastSource,
        data: TagCompound,
    },
}

impl CastEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            CastEvent::CastStarted { .. } => "cast_started",
            CastEvent::CastFinished { .. } => "cast_finished",
            CastEvent::ManaChanged { .. } => "mana_changed",
            CastEvent::EffectReplay { .. } => "effect_replay",
        }
    }
}

pub trait CastObserver {
    fn notify(&mut self, audience: Audience, event: CastEvent);
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl CastObserver for NullObserver {
    fn notify(&mut self, _audience: Audience, _event: CastEvent) {}
}

/// Keeps every event in emission order.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Vec<(Audience, CastEvent)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[(Audience, CastEvent)] {
        &self.events
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(|(_, event)| event.name()).collect()
    }

    pub fn take(&mut self) -> Vec<(Audience, CastEvent)> {
        std::mem::take(&mut self.events)
    }
}

impl CastObserver for RecordingObserver {
    fn notify(&mut self, audience: Audience, event: CastEvent) {
        self.events.push((audience, event));
    }
}
