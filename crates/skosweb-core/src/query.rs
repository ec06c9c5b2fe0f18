//! Provider-agnostic query and provider filter types.
//!
//! A [`Query`] is built by the HTTP layer from request parameters and handed
//! unchanged to a provider; only the provider interprets it.

use serde::{Deserialize, Serialize};

use crate::skos::ThingType;

/// How far a collection filter reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionDepth {
    /// Direct members, members of nested collections, and their narrower
    /// concepts when the collection infers concept relations.
    #[default]
    All,
    /// Direct members only.
    Members,
}

/// Restricts results to the members of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionFilter {
    pub id: String,
    #[serde(default)]
    pub depth: CollectionDepth,
}

/// Restricts results to entries carrying an external match.
///
/// `match_type` is kept verbatim; providers decide what an unknown kind means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    pub uri: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub match_type: Option<String>,
}

/// Search criteria for [`crate::VocabularyProvider::find`].
///
/// Absent fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub thing_type: Option<ThingType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collection: Option<CollectionFilter>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matches: Option<MatchFilter>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.thing_type.is_none()
            && self.label.is_none()
            && self.collection.is_none()
            && self.matches.is_none()
    }
}

/// Selects the providers taking part in a cross-provider search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFilter {
    /// Vocabulary ids or concept scheme URIs.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ids: Option<Vec<String>>,
    /// Subject tag a provider must carry.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subject: Option<String>,
}

impl ProviderFilter {
    pub fn is_empty(&self) -> bool {
        self.ids.is_none() && self.subject.is_none()
    }
}
