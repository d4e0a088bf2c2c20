//! Translation catalogs

use serde_json::Value;
use std::collections::HashMap;

use crate::error::I18nError;
use crate::Result;

/// Flat key -> text table. Nested JSON objects are flattened with `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(I18nError::InvalidCatalog(
                "top level must be an object".to_string(),
            ));
        };

        let mut entries = HashMap::new();
        for (key, value) in map {
            flatten(key, value, &mut entries);
        }
        Ok(Self { entries })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Text for `key`, or the key itself when it is missing.
    pub fn t(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: String, value: Value, out: &mut HashMap<String, String>) {
    match value {
        Value::String(text) => {
            out.insert(prefix, text);
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{prefix}.{key}"), nested, out);
            }
        }
        Value::Number(n) => {
            out.insert(prefix, n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix, b.to_string());
        }
        Value::Null | Value::Array(_) => {
            tracing::debug!(key = %prefix, "Skipping non-text catalog entry");
        }
    }
}
