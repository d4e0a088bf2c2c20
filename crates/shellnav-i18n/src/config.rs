//! i18n configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub supported_languages: Vec<String>,
    pub fallback_language: String,
    /// Catalog location relative to the deployment root, `{{lng}}` is replaced
    pub load_path: String,
    /// Query parameter that selects a language
    pub query_param: String,
    /// Settings key holding the last selected language
    pub preference_key: String,
}

impl I18nConfig {
    pub fn catalog_path(&self, language: &str) -> String {
        self.load_path.replace("{{lng}}", language)
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported_languages: ["en", "es", "de", "fr"]
                .into_iter()
                .map(String::from)
                .collect(),
            fallback_language: "en".to_string(),
            load_path: "locales/{{lng}}/translation.json".to_string(),
            query_param: "lng".to_string(),
            preference_key: "i18nextLng".to_string(),
        }
    }
}
