//! Xcode String Catalog (`.xcstrings`) document model
//!
//! Only the parts the translator reads or writes are typed. Everything else
//! (`version`, `comment`, `extractionState`, `variations`, ...) is carried
//! through `extra` so a load/save cycle does not drop data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// Declared source language used when the document has none
pub const FALLBACK_SOURCE_LANGUAGE: &str = "en";

/// Status of a localized value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    /// Not translated yet
    New,
    /// Up to date
    Translated,
    /// Flagged for a human to check
    NeedsReview,
    /// The key no longer exists in source code
    Stale,
}

impl fmt::Display for TranslationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationState::New => write!(f, "new"),
            TranslationState::Translated => write!(f, "translated"),
            TranslationState::NeedsReview => write!(f, "needs_review"),
            TranslationState::Stale => write!(f, "stale"),
        }
    }
}

/// Localized value: status and text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringUnit {
    /// Absent in some hand-written catalogs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TranslationState>,
    /// Localized text
    #[serde(default)]
    pub value: String,
}

impl StringUnit {
    /// Placeholder inserted for a missing target language
    pub fn pending() -> Self {
        Self {
            state: Some(TranslationState::Translated),
            value: String::new(),
        }
    }

    /// Unit in state `translated` holding `value`
    pub fn translated(value: impl Into<String>) -> Self {
        Self {
            state: Some(TranslationState::Translated),
            value: value.into(),
        }
    }
}

/// Per-language payload of an entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    /// Single value; absent when the language uses `variations`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_unit: Option<StringUnit>,
    /// Plural `variations`, `substitutions` and anything newer
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<StringUnit> for Localization {
    fn from(string_unit: StringUnit) -> Self {
        Self {
            string_unit: Some(string_unit),
            extra: Map::new(),
        }
    }
}

/// One translatable key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringEntry {
    /// Keyed by language code
    #[serde(default)]
    pub localizations: BTreeMap<String, Localization>,
    /// `comment`, `extractionState`, `shouldTranslate`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StringEntry {
    /// `stringUnit.value` for `lang`, if the entry has one (possibly empty)
    pub fn value(&self, lang: &str) -> Option<&str> {
        self.localizations
            .get(lang)
            .and_then(|localization| localization.string_unit.as_ref())
            .map(|unit| unit.value.as_str())
    }
}

/// A whole `.xcstrings` document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcStringsDocument {
    /// Declared `sourceLanguage`; see [`Self::declared_source_language`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    /// Entries keyed by string key
    #[serde(default)]
    pub strings: BTreeMap<String, StringEntry>,
    /// `version` and any other top-level field
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl XcStringsDocument {
    /// Parse a document from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(TranslationError::InvalidFormat {
                format: "xcstrings: top level must be a JSON object".to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| TranslationError::InvalidFormat {
            format: format!("xcstrings: {}", e),
        })
    }

    /// Serialize as pretty JSON with a trailing newline.
    ///
    /// Goes through [`Value`] so every object, flattened fields included,
    /// is written with its keys in lexicographic order, as Xcode does.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::to_value(self)?;
        let mut json = serde_json::to_string_pretty(&value)?;
        json.push('\n');
        Ok(json)
    }

    /// Read and validate a document from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TranslationError::FileError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let document = Self::from_json(&content)?;
        debug!(
            "Loaded {} with {} strings",
            path.display(),
            document.strings.len()
        );
        Ok(document)
    }

    /// Write the document to disk, creating parent directories as needed
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| TranslationError::FileError {
                        path: parent.display().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }

        tokio::fs::write(path, json)
            .await
            .map_err(|e| TranslationError::FileError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        debug!("Saved {}", path.display());
        Ok(())
    }

    /// Declared source language, or the fallback when absent
    pub fn declared_source_language(&self) -> &str {
        self.source_language
            .as_deref()
            .filter(|lang| !lang.is_empty())
            .unwrap_or(FALLBACK_SOURCE_LANGUAGE)
    }

    /// `strings[key].localizations[lang].stringUnit.value`
    pub fn value(&self, key: &str, lang: &str) -> Option<&str> {
        self.strings.get(key).and_then(|entry| entry.value(lang))
    }
}
