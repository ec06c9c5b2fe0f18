//! Core traits for skosweb abstractions.
//!
//! A [`VocabularyProvider`] fronts one concept scheme. Every operation is a
//! synchronous read: providers are loaded once and never mutated while
//! requests are served.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::Query;
use crate::skos::{ConceptId, ConceptScheme, Thing, ThingSummary};

/// Descriptive metadata of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Vocabulary id, unique within a registry (e.g. `TREES`).
    pub id: String,
    /// Language used for labels when a request does not ask for one.
    #[serde(default)]
    pub default_language: Option<String>,
    /// Free-form subject tags used to select providers.
    #[serde(default)]
    pub subject: Vec<String>,
}

/// Read access to a single vocabulary.
pub trait VocabularyProvider: Send + Sync {
    /// Description of this provider.
    fn metadata(&self) -> &ProviderMetadata;

    /// The concept scheme owning every entry of this provider.
    fn concept_scheme(&self) -> &Arc<ConceptScheme>;

    /// Look up a concept or collection by its id.
    fn get_by_id(&self, id: &str) -> Option<Thing>;

    /// Look up a concept or collection by its URI.
    fn get_by_uri(&self, uri: &str) -> Option<Thing>;

    /// Every entry, in provider order.
    fn get_all(&self, language: &str) -> Vec<ThingSummary>;

    /// Entries matching `query`, in provider order.
    fn find(&self, query: &Query, language: &str) -> Result<Vec<ThingSummary>>;

    /// Concepts without a broader concept.
    fn get_top_concepts(&self, language: &str) -> Vec<ThingSummary>;

    /// Entries shown at the root of a display tree.
    fn get_top_display(&self, language: &str) -> Vec<ThingSummary>;

    /// Entries shown below `id` in a display tree; `None` for an unknown id.
    fn get_children_display(&self, id: &str, language: &str) -> Option<Vec<ThingSummary>>;

    /// Ids of `id` and everything narrower; `None` for an unknown id.
    fn expand(&self, id: &str) -> Option<Vec<ConceptId>>;

    fn vocabulary_id(&self) -> &str {
        &self.metadata().id
    }

    fn default_language(&self) -> Option<&str> {
        self.metadata().default_language.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_deserialize_defaults() {
        let meta: ProviderMetadata = serde_json::from_str(r#"{"id": "TREES"}"#).unwrap();
        assert_eq!(meta.id, "TREES");
        assert!(meta.default_language.is_none());
        assert!(meta.subject.is_empty());
    }

    #[test]
    fn test_provider_is_object_safe() {
        fn assert_object_safe(_: Option<Arc<dyn VocabularyProvider>>) {}
        assert_object_safe(None);
    }
}
