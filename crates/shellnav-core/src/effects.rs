//! Visual effects lifecycle
//!
//! Each swap tears down what the previous page started (scroll triggers,
//! tweens, the ambient background) and starts the entry animations whose
//! guard element exists in the new content. Rendering is delegated to an
//! [`EffectDriver`].

use parking_lot::Mutex;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicU64, Ordering};

use shellnav_router::EffectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAnimation {
    pub name: &'static str,
    /// Played only when this selector matches in the new content
    pub guard: &'static str,
    /// Elements being animated
    pub targets: &'static str,
    /// Element whose visibility starts the animation; `None` plays immediately
    pub scroll_trigger: Option<&'static str>,
}

pub const ENTRY_ANIMATIONS: &[EntryAnimation] = &[
    EntryAnimation {
        name: "hero-content",
        guard: ".hero-content",
        targets: ".hero-content",
        scroll_trigger: None,
    },
    EntryAnimation {
        name: "hero-title",
        guard: ".hero h1",
        targets: ".hero h1",
        scroll_trigger: None,
    },
    EntryAnimation {
        name: "hero-text",
        guard: ".hero p",
        targets: ".hero p",
        scroll_trigger: None,
    },
    EntryAnimation {
        name: "hero-buttons",
        guard: ".hero-buttons a",
        targets: ".hero-buttons a",
        scroll_trigger: None,
    },
    EntryAnimation {
        name: "service-cards",
        guard: ".services-grid",
        targets: ".service-card",
        scroll_trigger: Some(".service-card"),
    },
    EntryAnimation {
        name: "why-items",
        guard: ".why-item",
        targets: ".why-item",
        scroll_trigger: Some(".why-choose-us"),
    },
    EntryAnimation {
        name: "headline",
        guard: ".headline",
        targets: ".headline",
        scroll_trigger: None,
    },
    EntryAnimation {
        name: "tagline",
        guard: ".tagline",
        targets: ".tagline",
        scroll_trigger: None,
    },
    EntryAnimation {
        name: "about-details",
        guard: ".about-details",
        targets: ".about-details h2, .about-details p",
        scroll_trigger: Some(".about-details"),
    },
    EntryAnimation {
        name: "milestones",
        guard: ".milestones",
        targets: ".timeline .event",
        scroll_trigger: Some(".milestones"),
    },
    EntryAnimation {
        name: "about-cta",
        guard: ".about-cta",
        targets: ".about-cta h2, .about-cta a",
        scroll_trigger: Some(".about-cta"),
    },
];

/// Tweens on these targets are killed on cleanup.
pub const TWEEN_TARGETS: &[&str] = &[
    ".service-card",
    ".hero-content",
    ".hero h1",
    ".hero p",
    ".hero-buttons a",
    ".why-item",
    ".about-details h2",
    ".about-details p",
    ".timeline .event",
    ".about-cta h2",
    ".about-cta a",
];

/// Element ids that host the ambient background. The last one present wins.
pub const AMBIENT_CONTAINERS: &[&str] = &["vanta-hero", "vanta-services"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmbientHandle(pub u64);

/// Renders effects. Implementations must tolerate calls when nothing is on screen.
pub trait EffectDriver: Send + Sync + 'static {
    fn kill_scroll_triggers(&self) -> Result<(), EffectError>;

    fn kill_tweens(&self, targets: &[&str]) -> Result<(), EffectError>;

    fn play(&self, animation: &EntryAnimation) -> Result<(), EffectError>;

    fn start_ambient(&self, container_id: &str) -> Result<AmbientHandle, EffectError>;

    fn destroy_ambient(&self, handle: AmbientHandle);

    /// Whether scroll-triggered effects exist and need a refresh after layout changes.
    fn supports_scroll_triggers(&self) -> bool {
        true
    }

    fn refresh_scroll_triggers(&self);
}

/// Driver that only logs what it would render.
#[derive(Debug, Default)]
pub struct TracingDriver {
    next_handle: AtomicU64,
}

impl EffectDriver for TracingDriver {
    fn kill_scroll_triggers(&self) -> Result<(), EffectError> {
        tracing::trace!("Killing scroll triggers");
        Ok(())
    }

    fn kill_tweens(&self, targets: &[&str]) -> Result<(), EffectError> {
        tracing::trace!(count = targets.len(), "Killing tweens");
        Ok(())
    }

    fn play(&self, animation: &EntryAnimation) -> Result<(), EffectError> {
        tracing::debug!(
            animation = animation.name,
            targets = animation.targets,
            "Playing entry animation"
        );
        Ok(())
    }

    fn start_ambient(&self, container_id: &str) -> Result<AmbientHandle, EffectError> {
        let handle = AmbientHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(container = container_id, handle = handle.0, "Started ambient effect");
        Ok(handle)
    }

    fn destroy_ambient(&self, handle: AmbientHandle) {
        tracing::debug!(handle = handle.0, "Destroyed ambient effect");
    }

    fn refresh_scroll_triggers(&self) {
        tracing::trace!("Refreshing scroll triggers");
    }
}

#[derive(Default)]
struct EffectsState {
    playing: Vec<&'static str>,
    ambient: Option<(AmbientHandle, String)>,
}

pub struct EffectsLifecycle<D> {
    driver: D,
    state: Mutex<EffectsState>,
}

impl<D: EffectDriver> EffectsLifecycle<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: Mutex::new(EffectsState::default()),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Names of entry animations started since the last cleanup.
    pub fn playing(&self) -> Vec<&'static str> {
        self.state.lock().playing.clone()
    }

    /// Container id of the running ambient effect.
    pub fn ambient_container(&self) -> Option<String> {
        self.state.lock().ambient.as_ref().map(|(_, id)| id.clone())
    }

    /// Kill every scroll trigger and tween started for the previous page.
    pub fn cleanup(&self) -> Result<(), EffectError> {
        self.state.lock().playing.clear();
        self.driver.kill_scroll_triggers()?;
        self.driver.kill_tweens(TWEEN_TARGETS)
    }

    /// Play every entry animation whose guard is present in `content`.
    ///
    /// A failing animation does not stop the others; the first error is returned.
    pub fn run_entry_effects(&self, content: &str) -> Result<(), EffectError> {
        let fragment = Html::parse_fragment(content);
        let mut first_error = None;

        for animation in ENTRY_ANIMATIONS {
            if !matches_any(&fragment, animation.guard) {
                continue;
            }
            match self.driver.play(animation) {
                Ok(()) => self.state.lock().playing.push(animation.name),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Replace the ambient background effect for the new content.
    pub fn run_ambient_effect(&self, content: &str) -> Result<(), EffectError> {
        let previous = self.state.lock().ambient.take();
        if let Some((handle, _)) = previous {
            self.driver.destroy_ambient(handle);
        }

        let fragment = Html::parse_fragment(content);
        for container in AMBIENT_CONTAINERS {
            if !matches_any(&fragment, &format!("#{container}")) {
                continue;
            }

            // several containers on one page: keep only the last
            let replaced = self.state.lock().ambient.take();
            if let Some((handle, _)) = replaced {
                self.driver.destroy_ambient(handle);
            }
            let handle = self.driver.start_ambient(container)?;
            self.state.lock().ambient = Some((handle, container.to_string()));
        }

        Ok(())
    }

    pub fn refresh(&self) {
        self.driver.refresh_scroll_triggers();
    }
}

fn matches_any(fragment: &Html, selector: &str) -> bool {
    match Selector::parse(selector) {
        Ok(sel) => fragment.select(&sel).next().is_some(),
        Err(_) => false,
    }
}
