//! Translation catalog.
//!
//! Translation files are nested JSON objects. The catalog flattens them into
//! dotted keys (`testResult.tos.document.scope.heading`).

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Translation file root must be an object")]
    NotAnObject,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of translated strings.
pub trait TextProvider {
    /// Text for `key`. A missing key renders as the key itself.
    fn text(&self, key: &str) -> String;
}

/// Flattened translations for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Catalog {
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> CatalogResult<Self> {
        let Value::Object(_) = value else {
            return Err(CatalogError::NotAnObject);
        };
        let mut entries = BTreeMap::new();
        flatten("", value, &mut entries);
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay another catalog; its entries win.
    pub fn merge(&mut self, other: Catalog) {
        self.entries.extend(other.entries);
    }
}

impl TextProvider for Catalog {
    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(&join(key), child, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(&join(&i.to_string()), child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
