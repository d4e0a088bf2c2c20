//! Navigation hooks backed by the translation service and the effects lifecycle

use std::sync::Arc;

use shellnav_i18n::I18n;
use shellnav_router::{EffectError, NavigationHooks, Shell};

use crate::effects::{EffectDriver, EffectsLifecycle};

pub struct SiteHooks<D> {
    i18n: Arc<I18n>,
    effects: Arc<EffectsLifecycle<D>>,
}

impl<D: EffectDriver> SiteHooks<D> {
    pub fn new(i18n: Arc<I18n>, effects: Arc<EffectsLifecycle<D>>) -> Self {
        Self { i18n, effects }
    }
}

impl<D: EffectDriver> NavigationHooks for SiteHooks<D> {
    fn translate(&self, shell: &mut Shell) {
        let translated = self.i18n.translate_markup(shell.content());
        shell.set_content(translated);
    }

    fn cleanup_effects(&self) -> Result<(), EffectError> {
        self.effects.cleanup()
    }

    fn run_entry_effects(&self, shell: &Shell) -> Result<(), EffectError> {
        self.effects.run_entry_effects(shell.content())
    }

    fn run_ambient_effect(&self, shell: &Shell) -> Result<(), EffectError> {
        self.effects.run_ambient_effect(shell.content())
    }

    fn wants_layout_refresh(&self) -> bool {
        self.effects.driver().supports_scroll_triggers()
    }

    fn refresh_layout_effects(&self) {
        self.effects.refresh();
    }
}
