//! Post-swap capabilities injected into the controller
//!
//! After a page is swapped in the controller runs, in order:
//! `translate` → (history push) → `cleanup_effects` → `run_entry_effects`
//! → `run_ambient_effect`, and later `refresh_layout_effects` once.

use crate::error::EffectError;
use crate::shell::Shell;

pub trait NavigationHooks: Send + Sync + 'static {
    /// Re-apply translations to the freshly swapped content.
    fn translate(&self, _shell: &mut Shell) {}

    /// Tear down effects started for the previous page.
    fn cleanup_effects(&self) -> Result<(), EffectError> {
        Ok(())
    }

    /// Start entry animations for whatever the new content contains.
    fn run_entry_effects(&self, _shell: &Shell) -> Result<(), EffectError> {
        Ok(())
    }

    /// (Re)start the decorative background effect.
    fn run_ambient_effect(&self, _shell: &Shell) -> Result<(), EffectError> {
        Ok(())
    }

    /// Whether `refresh_layout_effects` should be scheduled after a swap.
    fn wants_layout_refresh(&self) -> bool {
        false
    }

    /// Recompute scroll-triggered effects once layout has settled.
    fn refresh_layout_effects(&self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl NavigationHooks for NoopHooks {}
