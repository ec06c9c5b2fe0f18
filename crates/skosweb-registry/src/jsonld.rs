//! JSON-LD dumper for concept schemes, concepts and collections.
//!
//! Documents use the compact keys declared by the bundled SKOS context
//! (`uri` is `@id`, `type` is `@type`, labels and notes are language maps).
//! Relations are emitted as IRIs of the related entries; an id the provider
//! cannot resolve is dropped with a warning.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use skosweb_core::{
    ConceptId, Error, LabelType, Label, Note, Result, Source, Thing, ThingSummary, ThingType,
    VocabularyProvider,
};

/// The SKOS JSON-LD context document.
pub const SKOS_CONTEXT: &str = include_str!("context/skos.jsonld");

/// The `@context` object of [`SKOS_CONTEXT`], for inline embedding.
pub fn inline_context() -> Result<JsonValue> {
    let mut document: JsonValue = serde_json::from_str(SKOS_CONTEXT)?;
    document
        .get_mut("@context")
        .map(JsonValue::take)
        .ok_or_else(|| Error::Internal("SKOS context document has no @context".to_string()))
}

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Language tag to values.
pub type LanguageMap = BTreeMap<String, Vec<String>>;

/// A node optionally carrying an `@context`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonLdDocument<T> {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<JsonValue>,
    #[serde(flatten)]
    pub node: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceNode {
    pub citation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeNode {
    pub uri: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub id: String,
    #[serde(flatten)]
    pub lexical: BTreeMap<String, LanguageMap>,
    pub source: Vec<SourceNode>,
    pub language: Vec<String>,
    pub subject: Vec<String>,
    pub top_concepts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemeSummaryNode {
    pub uri: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub id: String,
    pub label: Option<String>,
    pub subject: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptNode {
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub id: ConceptId,
    pub in_scheme: String,
    #[serde(flatten)]
    pub lexical: BTreeMap<String, LanguageMap>,
    pub source: Vec<SourceNode>,
    pub broader: Vec<String>,
    pub narrower: Vec<String>,
    pub related: Vec<String>,
    pub member_of: Vec<String>,
    pub subordinate_array: Vec<String>,
    pub broad_match: Vec<String>,
    pub close_match: Vec<String>,
    pub exact_match: Vec<String>,
    pub narrow_match: Vec<String>,
    pub related_match: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub id: ConceptId,
    pub in_scheme: String,
    #[serde(flatten)]
    pub lexical: BTreeMap<String, LanguageMap>,
    pub source: Vec<SourceNode>,
    pub member: Vec<String>,
    pub member_of: Vec<String>,
    pub superordinate: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ThingNode {
    Concept(ConceptNode),
    Collection(CollectionNode),
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryNode {
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub id: ConceptId,
    pub label: Option<String>,
}

// =============================================================================
// DUMPING
// =============================================================================

const SCHEME_TYPE: &str = "skos:ConceptScheme";

fn node_type(kind: ThingType) -> &'static str {
    match kind {
        ThingType::Concept => "skos:Concept",
        ThingType::Collection => "skos:Collection",
    }
}

/// Labels and notes grouped by property and language.
fn lexical_properties(labels: &[Label], notes: &[Note]) -> BTreeMap<String, LanguageMap> {
    let mut properties: BTreeMap<String, LanguageMap> = BTreeMap::new();
    let labels = labels
        .iter()
        .filter(|l| l.label_type != LabelType::SortLabel)
        .map(|l| (l.label_type.to_string(), &l.language, &l.label));
    let notes = notes
        .iter()
        .map(|n| (n.note_type.to_string(), &n.language, &n.note));

    for (property, language, value) in labels.chain(notes) {
        properties
            .entry(property)
            .or_default()
            .entry(language.clone())
            .or_default()
            .push(value.clone());
    }
    properties
}

fn source_nodes(sources: &[Source]) -> Vec<SourceNode> {
    sources
        .iter()
        .map(|s| SourceNode {
            citation: s.citation.clone(),
        })
        .collect()
}

/// IRIs of the entries behind `ids`.
fn resolve_iris(ids: &[ConceptId], provider: &dyn VocabularyProvider) -> Vec<String> {
    ids.iter()
        .filter_map(|id| {
            let iri = provider
                .get_by_id(&id.to_string())
                .and_then(|t| t.uri().map(String::from));
            if iri.is_none() {
                warn!(
                    subsystem = "registry",
                    component = "jsonld",
                    op = "resolve_relation",
                    provider = %provider.vocabulary_id(),
                    concept_id = %id,
                    "A relation references a concept or collection that can not be found"
                );
            }
            iri
        })
        .collect()
}

/// Full dump of the provider's concept scheme.
pub fn dump_concept_scheme(
    provider: &dyn VocabularyProvider,
    context: Option<JsonValue>,
) -> JsonLdDocument<SchemeNode> {
    let scheme = provider.concept_scheme();
    let language = provider
        .default_language()
        .unwrap_or(skosweb_core::defaults::LANGUAGE);
    let top_concepts = provider
        .get_top_concepts(language)
        .into_iter()
        .filter_map(|c| c.uri)
        .collect();

    JsonLdDocument {
        context,
        node: SchemeNode {
            uri: scheme.uri.clone(),
            node_type: SCHEME_TYPE,
            id: provider.vocabulary_id().to_string(),
            lexical: lexical_properties(&scheme.labels, &scheme.notes),
            source: source_nodes(&scheme.sources),
            language: scheme.languages.clone(),
            subject: provider.metadata().subject.clone(),
            top_concepts,
        },
    }
}

/// Short description of a concept scheme, used when listing schemes.
pub fn dump_scheme_summary(
    provider: &dyn VocabularyProvider,
    language: &str,
    context: Option<JsonValue>,
) -> JsonLdDocument<SchemeSummaryNode> {
    let scheme = provider.concept_scheme();
    JsonLdDocument {
        context,
        node: SchemeSummaryNode {
            uri: scheme.uri.clone(),
            node_type: SCHEME_TYPE,
            id: provider.vocabulary_id().to_string(),
            label: scheme.label(language).map(|l| l.label.clone()),
            subject: provider.metadata().subject.clone(),
        },
    }
}

/// Full dump of a concept or collection owned by `provider`.
pub fn dump_thing(
    thing: &Thing,
    provider: &dyn VocabularyProvider,
    context: Option<JsonValue>,
) -> JsonLdDocument<ThingNode> {
    let in_scheme = provider.concept_scheme().uri.clone();
    let node = match thing {
        Thing::Concept(c) => ThingNode::Concept(ConceptNode {
            uri: c.uri.clone(),
            node_type: node_type(ThingType::Concept),
            id: c.id.clone(),
            in_scheme,
            lexical: lexical_properties(&c.labels, &c.notes),
            source: source_nodes(&c.sources),
            broader: resolve_iris(&c.broader, provider),
            narrower: resolve_iris(&c.narrower, provider),
            related: resolve_iris(&c.related, provider),
            member_of: resolve_iris(&c.member_of, provider),
            subordinate_array: resolve_iris(&c.subordinate_arrays, provider),
            broad_match: c.matches.broad.clone(),
            close_match: c.matches.close.clone(),
            exact_match: c.matches.exact.clone(),
            narrow_match: c.matches.narrow.clone(),
            related_match: c.matches.related.clone(),
        }),
        Thing::Collection(c) => ThingNode::Collection(CollectionNode {
            uri: c.uri.clone(),
            node_type: node_type(ThingType::Collection),
            id: c.id.clone(),
            in_scheme,
            lexical: lexical_properties(&c.labels, &c.notes),
            source: source_nodes(&c.sources),
            member: resolve_iris(&c.members, provider),
            member_of: resolve_iris(&c.member_of, provider),
            superordinate: resolve_iris(&c.superordinates, provider),
        }),
    };
    JsonLdDocument { context, node }
}

/// Shallow node for a search or listing hit.
pub fn dump_summary(
    summary: &ThingSummary,
    context: Option<JsonValue>,
) -> JsonLdDocument<SummaryNode> {
    JsonLdDocument {
        context,
        node: SummaryNode {
            uri: summary.uri.clone(),
            node_type: node_type(summary.kind),
            id: summary.id.clone(),
            label: summary.label.clone(),
        },
    }
}
