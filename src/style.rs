//! Category to CSS class lookup

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Maps a record's category to the CSS class attached to its marker element.
///
/// Lookup is exact and case-sensitive. Backed by a `BTreeMap` so iteration
/// and serialization are sorted by category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryStyleTable {
    classes: BTreeMap<String, String>,
}

impl CategoryStyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, category: impl Into<String>, class: impl Into<String>) -> Self {
        self.classes.insert(category.into(), class.into());
        self
    }

    pub fn lookup(&self, category: &str) -> Option<&str> {
        self.classes.get(category).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a flat JSON object such as `{"Apple": "apple"}`.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(s)
            .map_err(|e| Error::ConfigError(format!("Invalid style table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read style table {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&s)
    }

    /// Every class must be usable as a single CSS class token.
    pub fn validate(&self) -> Result<()> {
        for (category, class) in &self.classes {
            if !is_css_class(class) {
                return Err(Error::ConfigError(format!(
                    "Style class {:?} for category {:?} is not a valid CSS class name",
                    class, category
                )));
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CategoryStyleTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            classes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Conservative CSS identifier check: letters, digits, `-` and `_`, not
/// starting with a digit or `--`.
pub(crate) fn is_css_class(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if first.is_ascii_digit() || s == "-" || s.starts_with("--") {
        return false;
    }
    if first == '-' && s[1..].starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
