//! Rendering of concepts and collections.
//!
//! The JSON form resolves every relation id against the owning provider and
//! projects the related entry to `{id, type, uri, label}`; the related
//! entry's own relations are never followed, so mutually referencing
//! entries render in one hop. The JSON-LD form is produced by the registry's
//! dumper.
//!
//! A [`RendererTable`] maps each (entry kind, serialization) pair to one
//! render function and is built once at start-up.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::warn;

use skosweb_core::{
    select_label, select_label_in_language, ConceptId, Error, Label, Matches, Note, Result, Source,
    Thing, ThingType, VocabularyProvider,
};
use skosweb_registry::{dump_thing, ProviderRef, Registry};

use crate::negotiation::SerializationStrategy;

// =============================================================================
// JSON OUTPUT TYPES
// =============================================================================

/// A related entry, without its own relations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationSummary {
    pub id: ConceptId,
    #[serde(rename = "type")]
    pub kind: ThingType,
    pub uri: Option<String>,
    pub label: Option<String>,
}

/// The concept scheme an entry belongs to, with all of its labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeSummary {
    pub uri: String,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConceptJson {
    pub id: ConceptId,
    #[serde(rename = "type")]
    pub kind: ThingType,
    pub uri: Option<String>,
    pub label: Option<String>,
    pub concept_scheme: SchemeSummary,
    pub labels: Vec<Label>,
    pub notes: Vec<Note>,
    pub sources: Vec<Source>,
    pub narrower: Vec<RelationSummary>,
    pub broader: Vec<RelationSummary>,
    pub related: Vec<RelationSummary>,
    pub member_of: Vec<RelationSummary>,
    pub subordinate_arrays: Vec<RelationSummary>,
    pub matches: Matches,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionJson {
    pub id: ConceptId,
    #[serde(rename = "type")]
    pub kind: ThingType,
    pub uri: Option<String>,
    pub label: Option<String>,
    pub concept_scheme: SchemeSummary,
    pub labels: Vec<Label>,
    pub notes: Vec<Note>,
    pub sources: Vec<Source>,
    pub members: Vec<RelationSummary>,
    pub member_of: Vec<RelationSummary>,
    pub superordinates: Vec<RelationSummary>,
    pub infer_concept_relations: bool,
}

// =============================================================================
// RENDERING
// =============================================================================

/// Per-request inputs shared by all render functions.
pub struct RenderContext<'a> {
    pub registry: &'a Registry,
    pub language: &'a str,
    /// `@context` value for JSON-LD output.
    pub jsonld_context: &'a JsonValue,
}

/// Display label: the requested language, then the provider's default
/// language, then any label.
pub fn display_label(labels: &[Label], language: &str, default_language: Option<&str>) -> Option<String> {
    select_label_in_language(labels, language)
        .or_else(|| default_language.and_then(|d| select_label_in_language(labels, d)))
        .or_else(|| select_label(labels, language))
        .map(|l| l.label.clone())
}

fn owning_provider(thing: &Thing, registry: &Registry) -> Result<ProviderRef> {
    let scheme = thing.concept_scheme().ok_or_else(|| {
        Error::Internal(format!("{} {} has no concept scheme", thing.kind(), thing.id()))
    })?;
    registry.get_provider(&scheme.uri).ok_or_else(|| {
        Error::Internal(format!("No provider registered for concept scheme {}", scheme.uri))
    })
}

fn scheme_summary(provider: &dyn VocabularyProvider) -> SchemeSummary {
    let scheme = provider.concept_scheme();
    SchemeSummary {
        uri: scheme.uri.clone(),
        labels: scheme.labels.clone(),
    }
}

fn map_relation(thing: &Thing, language: &str, default_language: Option<&str>) -> RelationSummary {
    RelationSummary {
        id: thing.id().clone(),
        kind: thing.kind(),
        uri: thing.uri().map(String::from),
        label: display_label(thing.labels(), language, default_language),
    }
}

/// Resolve relation ids one hop deep. Ids the provider does not know are
/// dropped with a warning.
pub fn map_relations(
    ids: &[ConceptId],
    provider: &dyn VocabularyProvider,
    language: &str,
) -> Vec<RelationSummary> {
    ids.iter()
        .filter_map(|id| match provider.get_by_id(&id.to_string()) {
            Some(related) => Some(map_relation(&related, language, provider.default_language())),
            None => {
                warn!(
                    subsystem = "api",
                    component = "renderer",
                    op = "map_relations",
                    provider = %provider.vocabulary_id(),
                    concept_id = %id,
                    "A relation references a concept or collection that can not be found. Please check the integrity of your data."
                );
                None
            }
        })
        .collect()
}

pub fn render_concept_json(thing: &Thing, ctx: &RenderContext<'_>) -> Result<JsonValue> {
    let Thing::Concept(concept) = thing else {
        return Err(Error::Internal(format!("{} is not a concept", thing.id())));
    };
    let provider = owning_provider(thing, ctx.registry)?;
    let p = provider.as_ref();
    let output = ConceptJson {
        id: concept.id.clone(),
        kind: ThingType::Concept,
        uri: concept.uri.clone(),
        label: display_label(&concept.labels, ctx.language, p.default_language()),
        concept_scheme: scheme_summary(p),
        labels: concept.labels.clone(),
        notes: concept.notes.clone(),
        sources: concept.sources.clone(),
        narrower: map_relations(&concept.narrower, p, ctx.language),
        broader: map_relations(&concept.broader, p, ctx.language),
        related: map_relations(&concept.related, p, ctx.language),
        member_of: map_relations(&concept.member_of, p, ctx.language),
        subordinate_arrays: map_relations(&concept.subordinate_arrays, p, ctx.language),
        matches: concept.matches.clone(),
    };
    Ok(serde_json::to_value(output)?)
}

pub fn render_collection_json(thing: &Thing, ctx: &RenderContext<'_>) -> Result<JsonValue> {
    let Thing::Collection(collection) = thing else {
        return Err(Error::Internal(format!("{} is not a collection", thing.id())));
    };
    let provider = owning_provider(thing, ctx.registry)?;
    let p = provider.as_ref();
    let output = CollectionJson {
        id: collection.id.clone(),
        kind: ThingType::Collection,
        uri: collection.uri.clone(),
        label: display_label(&collection.labels, ctx.language, p.default_language()),
        concept_scheme: scheme_summary(p),
        labels: collection.labels.clone(),
        notes: collection.notes.clone(),
        sources: collection.sources.clone(),
        members: map_relations(&collection.members, p, ctx.language),
        member_of: map_relations(&collection.member_of, p, ctx.language),
        superordinates: map_relations(&collection.superordinates, p, ctx.language),
        infer_concept_relations: collection.infer_concept_relations,
    };
    Ok(serde_json::to_value(output)?)
}

/// JSON-LD dump of a concept or collection.
pub fn render_thing_jsonld(thing: &Thing, ctx: &RenderContext<'_>) -> Result<JsonValue> {
    let provider = owning_provider(thing, ctx.registry)?;
    let document = dump_thing(thing, provider.as_ref(), Some(ctx.jsonld_context.clone()));
    Ok(serde_json::to_value(document)?)
}

pub type RenderFn = fn(&Thing, &RenderContext<'_>) -> Result<JsonValue>;

/// Render functions keyed by entry kind and serialization.
pub struct RendererTable {
    renderers: HashMap<(ThingType, SerializationStrategy), RenderFn>,
}

impl Default for RendererTable {
    fn default() -> Self {
        let mut renderers: HashMap<(ThingType, SerializationStrategy), RenderFn> = HashMap::new();
        renderers.insert(
            (ThingType::Concept, SerializationStrategy::Json),
            render_concept_json,
        );
        renderers.insert(
            (ThingType::Collection, SerializationStrategy::Json),
            render_collection_json,
        );
        renderers.insert(
            (ThingType::Concept, SerializationStrategy::JsonLd),
            render_thing_jsonld,
        );
        renderers.insert(
            (ThingType::Collection, SerializationStrategy::JsonLd),
            render_thing_jsonld,
        );
        Self { renderers }
    }
}

impl RendererTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &self,
        thing: &Thing,
        strategy: SerializationStrategy,
        ctx: &RenderContext<'_>,
    ) -> Result<JsonValue> {
        let render = self.renderers.get(&(thing.kind(), strategy)).ok_or_else(|| {
            Error::Internal(format!("No renderer for {} as {:?}", thing.kind(), strategy))
        })?;
        render(thing, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use skosweb_core::{Concept, ConceptScheme, LabelType, ProviderMetadata};
    use skosweb_registry::test_fixtures::{trees_registry, TREES_URI};
    use skosweb_registry::MemoryProvider;

    fn render(registry: &Registry, id: &str, language: &str, strategy: SerializationStrategy) -> JsonValue {
        let provider = registry.get_provider("TREES").unwrap();
        let thing = provider.get_by_id(id).unwrap();
        let context = JsonValue::String("http://localhost/jsonld/context/skos".to_string());
        let ctx = RenderContext {
            registry,
            language,
            jsonld_context: &context,
        };
        RendererTable::new().render(&thing, strategy, &ctx).unwrap()
    }

    #[test]
    fn test_concept_json_shape() {
        let registry = trees_registry();
        let json = render(&registry, "1", "en", SerializationStrategy::Json);

        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "concept");
        assert_eq!(json["uri"], "http://python.com/trees/larch");
        assert_eq!(json["label"], "The Larch");
        assert_eq!(json["concept_scheme"]["uri"], TREES_URI);
        assert_eq!(json["concept_scheme"]["labels"].as_array().unwrap().len(), 2);
        assert_eq!(json["labels"][0]["type"], "prefLabel");
        assert_eq!(json["notes"][0]["type"], "definition");
        assert!(json["notes"][0]["markup"].is_null());
        assert!(json["sources"][0]["citation"].is_string());
        for relation in ["narrower", "broader", "related", "member_of", "subordinate_arrays"] {
            assert!(json[relation].is_array(), "missing {}", relation);
        }
        assert!(json.get("members").is_none());
        assert_eq!(
            json["matches"]["close"][0],
            "http://id.python.org/different/types/of/trees/nr/1/the/larch"
        );
        assert!(json["matches"]["exact"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_concept_label_per_language() {
        let registry = trees_registry();
        assert_eq!(
            render(&registry, "1", "nl", SerializationStrategy::Json)["label"],
            "De Lariks"
        );
        assert_eq!(
            render(&registry, "1", "en", SerializationStrategy::Json)["label"],
            "The Larch"
        );
    }

    #[test]
    fn test_collection_json_shape() {
        let registry = trees_registry();
        let json = render(&registry, "3", "nl", SerializationStrategy::Json);

        assert_eq!(json["type"], "collection");
        assert_eq!(json["label"], "Bomen per soort");
        assert!(json.get("narrower").is_none());
        assert!(json.get("broader").is_none());
        assert!(json.get("related").is_none());
        assert_eq!(json["infer_concept_relations"], true);

        let members = json["members"].as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0]["id"], 1);
        assert_eq!(members[0]["type"], "concept");
        assert_eq!(members[0]["label"], "De Lariks");
        assert!(members[0].get("broader").is_none());
        assert_eq!(members[1]["label"], "De Paardekastanje");
    }

    #[test]
    fn test_fallback_to_provider_default_language() {
        let registry = trees_registry();
        let json = render(&registry, "3", "fr", SerializationStrategy::Json);
        assert_eq!(json["label"], "Bomen per soort");
    }

    #[test]
    fn test_jsonld_rendering_through_table() {
        let registry = trees_registry();
        let json = render(&registry, "1", "en", SerializationStrategy::JsonLd);
        assert_eq!(json["@context"], "http://localhost/jsonld/context/skos");
        assert_eq!(json["type"], "skos:Concept");
    }

    #[test]
    fn test_dangling_and_cyclic_relations() {
        let concept = |id: i64, broader: Vec<i64>, narrower: Vec<i64>| {
            Thing::from(Concept {
                id: ConceptId::Int(id),
                uri: Some(format!("urn:x-skosweb:cycle:{}", id)),
                labels: vec![Label::new(format!("c{}", id), LabelType::PrefLabel, "en")],
                broader: broader.into_iter().map(ConceptId::Int).collect(),
                narrower: narrower.into_iter().map(ConceptId::Int).collect(),
                ..Default::default()
            })
        };
        let provider = MemoryProvider::new(
            ProviderMetadata {
                id: "CYCLE".to_string(),
                ..Default::default()
            },
            ConceptScheme::new("urn:x-skosweb:cycle", vec![]),
            vec![concept(1, vec![2], vec![2, 99]), concept(2, vec![1], vec![1])],
        );
        let mut registry = Registry::new();
        registry.register_provider(Arc::new(provider)).unwrap();

        let thing = registry.get_provider("CYCLE").unwrap().get_by_id("1").unwrap();
        let context = JsonValue::Null;
        let ctx = RenderContext {
            registry: &registry,
            language: "en",
            jsonld_context: &context,
        };
        let json = render_concept_json(&thing, &ctx).unwrap();

        let narrower = json["narrower"].as_array().unwrap();
        assert_eq!(narrower.len(), 1);
        assert_eq!(narrower[0]["id"], 2);
        assert!(narrower[0].get("narrower").is_none());
        assert_eq!(json["broader"][0]["label"], "c2");
    }

    #[test]
    fn test_unregistered_scheme_is_internal_error() {
        let registry = Registry::new();
        let thing = skosweb_registry::test_fixtures::trees().get_by_id("1").unwrap();
        let context = JsonValue::Null;
        let ctx = RenderContext {
            registry: &registry,
            language: "en",
            jsonld_context: &context,
        };
        assert!(matches!(
            render_concept_json(&thing, &ctx),
            Err(Error::Internal(_))
        ));
    }

    #[test]
    fn test_display_label_fallbacks() {
        let labels = vec![
            Label::new("The Chestnut", LabelType::PrefLabel, "en"),
            Label::new("De Paardekastanje", LabelType::AltLabel, "nl"),
        ];
        assert_eq!(
            display_label(&labels, "fr", Some("nl")).as_deref(),
            Some("De Paardekastanje")
        );
        assert_eq!(display_label(&labels, "fr", None).as_deref(), Some("The Chestnut"));
        assert_eq!(display_label(&[], "fr", Some("nl")), None);
    }
}
