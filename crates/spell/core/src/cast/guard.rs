//! Scoped replacement of a spell's live configuration.

use core::ops::{Deref, DerefMut};

use crate::config::SpellParameterConfig;
use crate::env::ParameterizedSpell;

/// Holds a spell with a temporarily installed configuration.
///
/// The configuration that was live before [`ParameterGuard::apply`] is put
/// back when the guard drops, on every exit path. Nested guards restore in
/// reverse order of application.
pub struct ParameterGuard<'s, S: ParameterizedSpell + ?Sized> {
    spell: &'s mut S,
    previous: SpellParameterConfig,
}

impl<'s, S: ParameterizedSpell + ?Sized> ParameterGuard<'s, S> {
    pub fn apply(spell: &'s mut S, config: SpellParameterConfig) -> Self {
        let previous = spell.apply_parameter_overrides(config);
        Self { spell, previous }
    }

    /// Configuration that will be restored.
    pub fn previous(&self) -> &SpellParameterConfig {
        &self.previous
    }

    /// Restores now instead of at end of scope.
    pub fn restore(self) {
        drop(self);
    }
}

impl<S: ParameterizedSpell + ?Sized> Deref for ParameterGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.spell
    }
}

impl<S: ParameterizedSpell + ?Sized> DerefMut for ParameterGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.spell
    }
}

impl<S: ParameterizedSpell + ?Sized> Drop for ParameterGuard<'_, S> {
    fn drop(&mut self) {
        self.spell.restore_parameters(self.previous);
    }
}
