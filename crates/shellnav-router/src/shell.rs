//! Persistent page shell
//!
//! The shell is everything that survives a navigation: the header/footer
//! links, the menu state and the scroll position. Only its content area is
//! replaced when a page is swapped in. A renderer mirrors this state.

use scraper::{Html, Selector};
use serde::Serialize;

use crate::path::{CanonicalPath, PathNormalizer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// `href` attribute as written
    pub href: String,
    /// Normalized form, used for active-link comparison
    pub path: CanonicalPath,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

pub struct Shell {
    normalizer: PathNormalizer,
    /// Inner markup of the content area
    content: String,
    /// Links outside the content area (header, footer)
    chrome_links: Vec<NavLink>,
    /// Links inside the current content
    content_links: Vec<NavLink>,
    active_path: Option<CanonicalPath>,
    scroll_top: u32,
    last_scroll: Option<ScrollBehavior>,
    menu_open: bool,
}

impl Shell {
    pub fn new<I, S>(normalizer: PathNormalizer, chrome_hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chrome_links = chrome_hrefs
            .into_iter()
            .map(|href| make_link(&normalizer, href.into()))
            .collect();

        Self {
            normalizer,
            content: String::new(),
            chrome_links,
            content_links: Vec::new(),
            active_path: None,
            scroll_top: 0,
            last_scroll: None,
            menu_open: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content area. Links inside it keep the current active path.
    pub fn set_content(&mut self, markup: impl Into<String>) {
        self.content = markup.into();
        self.content_links = extract_links(&self.content)
            .into_iter()
            .map(|href| make_link(&self.normalizer, href))
            .collect();

        if let Some(active) = self.active_path.clone() {
            for link in &mut self.content_links {
                link.active = link.path == active;
            }
        }
    }

    /// All on-page links, chrome first.
    pub fn links(&self) -> impl Iterator<Item = &NavLink> {
        self.chrome_links.iter().chain(self.content_links.iter())
    }

    /// Mark every link whose normalized href equals `path` as active, all others inactive.
    pub fn set_active_path(&mut self, path: &CanonicalPath) {
        for link in self
            .chrome_links
            .iter_mut()
            .chain(self.content_links.iter_mut())
        {
            link.active = &link.path == path;
        }
        self.active_path = Some(path.clone());
    }

    pub fn active_path(&self) -> Option<&CanonicalPath> {
        self.active_path.as_ref()
    }

    pub fn active_hrefs(&self) -> Vec<&str> {
        self.links()
            .filter(|link| link.active)
            .map(|link| link.href.as_str())
            .collect()
    }

    pub fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.scroll_top = 0;
        self.last_scroll = Some(behavior);
    }

    pub fn set_scroll_top(&mut self, top: u32) {
        self.scroll_top = top;
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn last_scroll(&self) -> Option<ScrollBehavior> {
        self.last_scroll
    }

    /// Open or close the mobile navigation menu. Returns the new state.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }
}

fn make_link(normalizer: &PathNormalizer, href: String) -> NavLink {
    NavLink {
        path: normalizer.normalize(&href),
        href,
        active: false,
    }
}

fn extract_links(markup: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let fragment = Html::parse_fragment(markup);
    fragment
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}
