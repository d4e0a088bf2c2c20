//! Site configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use shellnav_i18n::I18nConfig;
use shellnav_router::RouterConfig;

use crate::error::CoreError;
use crate::Result;

/// Repository name, used as the deployment subpath on hosted pages.
pub const DEFAULT_REPO: &str = "gercotronic-website";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub router: RouterConfig,
    pub i18n: I18nConfig,
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Header and footer links, tracked for active-link highlighting
    pub chrome_links: Vec<String>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            router: RouterConfig::default(),
            i18n: I18nConfig::default(),
            database_path: data_dir.join("shellnav.db"),
            chrome_links: [
                "pages/home.html",
                "pages/services.html",
                "pages/about.html",
                "pages/contact.html",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    /// Defaults for a site served from `location`, detecting a hosted subpath.
    pub fn for_location(location: &Url) -> Self {
        Self {
            router: RouterConfig::for_location(location, DEFAULT_REPO),
            ..Self::default()
        }
    }

    /// Read a JSON config file; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let origin = Url::parse(&self.router.origin)
            .map_err(|e| CoreError::Config(format!("invalid origin '{}': {e}", self.router.origin)))?;
        if origin.cannot_be_a_base() {
            return Err(CoreError::Config(format!(
                "origin '{}' cannot be a base URL",
                self.router.origin
            )));
        }

        if !self
            .i18n
            .supported_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&self.i18n.fallback_language))
        {
            return Err(CoreError::Config(format!(
                "fallback language '{}' is not supported",
                self.i18n.fallback_language
            )));
        }

        Ok(())
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Shellnav"))
            .unwrap_or_else(|| PathBuf::from(".shellnav"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_hosted_location() {
        let location = Url::parse("https://gercotronic.github.io/gercotronic-website/").unwrap();
        let config = Config::for_location(&location);
        assert_eq!(config.router.base_path.as_str(), "/gercotronic-website/");
        assert_eq!(config.router.origin, "https://gercotronic.github.io");
        config.validate().unwrap();
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(
            &path,
            r#"{ "router": { "origin": "https://site.example", "cache_capacity": 4 },
                 "i18n": { "supported_languages": ["en", "de"] } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.router.cache_capacity, 4);
        assert_eq!(config.router.default_path, "pages/home.html");
        assert_eq!(config.i18n.fallback_language, "en");
        assert_eq!(config.chrome_links.len(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_origin_and_fallback() {
        let mut config = Config::default();
        config.router.origin = "not a url".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = Config::default();
        config.i18n.fallback_language = "it".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
