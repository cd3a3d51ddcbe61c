//! Controlled vocabulary of recognized DSL terms.
//!
//! A vocabulary maps a category name (`sources`, `dimensions_urls`, ...) to
//! either a list of terms or a mapping whose keys are the terms. It is loaded
//! once and handed, read-only, to whatever needs it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ConsoleError;
use crate::words::listify_and_unify;

pub const SOURCES: &str = "sources";
pub const DIMENSIONS_URLS: &str = "dimensions_urls";

const BUILTIN_VOCABULARY: &str = include_str!("vocabulary.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    categories: BTreeMap<String, Value>,
}

impl Vocabulary {
    /// The vocabulary shipped with the crate.
    pub fn builtin() -> Result<Self, ConsoleError> {
        Self::from_json_str(BUILTIN_VOCABULARY)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConsoleError> {
        serde_json::from_str(input).map_err(|e| ConsoleError::Vocabulary(e.to_string()))
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConsoleError> {
        toml::from_str(input).map_err(|e| ConsoleError::Vocabulary(e.to_string()))
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConsoleError> {
        serde_yaml::from_str(input).map_err(|e| ConsoleError::Vocabulary(e.to_string()))
    }

    /// Load a vocabulary file, choosing the decoder from the file extension.
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let decode: fn(&str) -> Result<Self, ConsoleError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            _ => return Err(ConsoleError::UnknownVocabularyFormat(path.to_path_buf())),
        };
        let vocabulary = decode(&std::fs::read_to_string(path)?)?;

        debug!(
            "loaded vocabulary from {} with {} categories",
            path.display(),
            vocabulary.categories.len()
        );
        Ok(vocabulary)
    }

    pub fn category(&self, name: &str) -> Option<&Value> {
        self.categories.get(name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Sorted terms of a category; an unknown category has no terms.
    pub fn terms(&self, category: &str) -> Result<Vec<String>, ConsoleError> {
        match self.categories.get(category) {
            Some(value) => listify_and_unify(&[value]),
            None => Ok(Vec::new()),
        }
    }

    pub fn contains(&self, category: &str, term: &str) -> bool {
        match self.categories.get(category) {
            Some(Value::Object(map)) => map.contains_key(term),
            Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(term)),
            _ => false,
        }
    }

    /// Whether `term` names a source that can follow `search`.
    pub fn is_source(&self, term: &str) -> bool {
        self.contains(SOURCES, term)
    }

    /// Web URL of an object, built from the URL prefix registered for its type.
    ///
    /// ```
    /// use dslconsole::Vocabulary;
    ///
    /// let vocabulary = Vocabulary::builtin()?;
    /// assert_eq!(
    ///     vocabulary.dimensions_url("grant.1234", "grants").as_deref(),
    ///     Some("https://app.dimensions.ai/details/grant/grant.1234")
    /// );
    /// assert_eq!(vocabulary.dimensions_url("x", "unicorns"), None);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn dimensions_url(&self, obj_id: &str, obj_type: &str) -> Option<String> {
        self.categories
            .get(DIMENSIONS_URLS)?
            .get(obj_type)?
            .as_str()
            .map(|prefix| format!("{prefix}{obj_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_builtin_vocabulary() {
        let vocabulary = Vocabulary::builtin().unwrap();
        assert!(vocabulary.is_source("publications"));
        assert!(vocabulary.is_source("clinical_trials"));
        assert!(!vocabulary.is_source("funders"));
        assert!(vocabulary.contains("lang", "aggregate"));

        let sources = vocabulary.terms(SOURCES).unwrap();
        let mut sorted = sources.clone();
        sorted.sort();
        assert_eq!(sources, sorted);
        assert!(sources.contains(&"grants".to_string()));
    }

    #[test]
    fn test_list_and_mapping_categories() {
        let vocabulary = Vocabulary::from_json_str(
            r#"{"sources": ["grants", "patents"], "dimensions_urls": {"grants": "https://x/grant/"}}"#,
        )
        .unwrap();

        assert!(vocabulary.is_source("grants"));
        assert!(!vocabulary.is_source("publications"));
        assert!(vocabulary.contains(DIMENSIONS_URLS, "grants"));
        assert_eq!(
            vocabulary.dimensions_url("g1", "grants"),
            Some("https://x/grant/g1".to_string())
        );
        assert_eq!(vocabulary.terms("missing").unwrap(), Vec::<String>::new());
        assert_eq!(
            vocabulary.category_names().collect::<Vec<_>>(),
            vec!["dimensions_urls", "sources"]
        );
    }

    #[test]
    fn test_scalar_category() {
        let vocabulary = Vocabulary::from_json_str(r#"{"sources": 3}"#).unwrap();
        assert!(!vocabulary.is_source("3"));
        assert!(matches!(
            vocabulary.terms(SOURCES),
            Err(ConsoleError::TypeUnsupported(_))
        ));
    }

    #[test]
    fn test_toml_and_yaml_sources() {
        let toml = Vocabulary::from_toml_str(
            "sources = [\"grants\"]\n\n[dimensions_urls]\ngrants = \"https://x/grant/\"\n",
        )
        .unwrap();
        assert!(toml.is_source("grants"));
        assert_eq!(toml.dimensions_url("1", "grants").as_deref(), Some("https://x/grant/1"));

        let yaml = Vocabulary::from_yaml_str("sources:\n  patents: {}\n  grants: {}\n").unwrap();
        assert_eq!(yaml.terms(SOURCES).unwrap(), vec!["grants", "patents"]);
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
        write!(file, "sources:\n  - datasets\n").unwrap();
        let vocabulary = Vocabulary::load(file.path()).unwrap();
        assert!(vocabulary.is_source("datasets"));

        let other = Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            Vocabulary::load(other.path()),
            Err(ConsoleError::UnknownVocabularyFormat(_))
        ));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            Vocabulary::from_json_str("{not json"),
            Err(ConsoleError::Vocabulary(_))
        ));
    }
}
