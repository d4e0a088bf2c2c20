//! Document-level event delegation
//!
//! Clicks and hovers on any link, and history moves, are funnelled through
//! [`NavigationController::dispatch`]. Work is spawned onto the runtime;
//! the caller only learns whether the browser default must be suppressed.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::controller::{NavigateOptions, NavigationController};
use crate::fetch::PageFetcher;
use crate::history::PopStateEvent;
use crate::hooks::NavigationHooks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// Click on (or inside) a link; `href` is its raw attribute
    Click { href: Option<String> },
    /// Pointer entered a link
    Hover { href: Option<String> },
    PopState(PopStateEvent),
}

#[derive(Debug)]
pub struct Dispatch {
    /// The browser's own handling of the event must be suppressed
    pub default_prevented: bool,
    /// Spawned navigation or prefetch, if any
    pub task: Option<JoinHandle<()>>,
}

impl Dispatch {
    fn ignored() -> Self {
        Self {
            default_prevented: false,
            task: None,
        }
    }
}

impl<F, H> NavigationController<F, H>
where
    F: PageFetcher,
    H: NavigationHooks,
{
    pub fn dispatch(self: &Arc<Self>, event: RouterEvent) -> Dispatch {
        match event {
            RouterEvent::Click { href: Some(href) } if self.is_routable(&href) => {
                let this = Arc::clone(self);
                let task = tokio::spawn(async move {
                    this.navigate(&href, true, NavigateOptions::default()).await;
                });
                Dispatch {
                    default_prevented: true,
                    task: Some(task),
                }
            }
            RouterEvent::Hover { href: Some(href) } if self.is_routable(&href) => {
                let this = Arc::clone(self);
                let task = tokio::spawn(async move {
                    this.prefetch(&href).await;
                });
                Dispatch {
                    default_prevented: false,
                    task: Some(task),
                }
            }
            RouterEvent::PopState(event) => {
                let this = Arc::clone(self);
                let task = tokio::spawn(async move {
                    this.handle_pop_state(event).await;
                });
                Dispatch {
                    default_prevented: false,
                    task: Some(task),
                }
            }
            _ => Dispatch::ignored(),
        }
    }
}
