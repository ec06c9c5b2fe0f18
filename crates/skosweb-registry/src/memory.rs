//! Dictionary-backed vocabulary provider.
//!
//! Entries are kept in insertion order and every lookup is a linear scan;
//! vocabularies served this way are small enough that an index would only
//! add bookkeeping.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use skosweb_core::{
    CollectionDepth, ConceptId, ConceptScheme, Error, MatchType, ProviderMetadata, Query, Result,
    Thing, ThingSummary, ThingType, VocabularyProvider,
};

/// A provider holding all concepts and collections of one scheme in memory.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    metadata: ProviderMetadata,
    concept_scheme: Arc<ConceptScheme>,
    things: Vec<Thing>,
}

impl MemoryProvider {
    /// Build a provider; every entry is attached to `concept_scheme`.
    pub fn new(metadata: ProviderMetadata, concept_scheme: ConceptScheme, things: Vec<Thing>) -> Self {
        let concept_scheme = Arc::new(concept_scheme);
        let things = things
            .into_iter()
            .map(|mut thing| {
                match &mut thing {
                    Thing::Concept(c) => c.concept_scheme = Some(Arc::clone(&concept_scheme)),
                    Thing::Collection(c) => c.concept_scheme = Some(Arc::clone(&concept_scheme)),
                }
                thing
            })
            .collect();

        Self {
            metadata,
            concept_scheme,
            things,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.things.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    fn lookup(&self, id: &str) -> Option<&Thing> {
        self.things.iter().find(|t| t.id().matches(id))
    }

    fn lookup_id(&self, id: &ConceptId) -> Option<&Thing> {
        self.lookup(&id.to_string())
    }

    fn summarize<'a>(
        &self,
        things: impl Iterator<Item = &'a Thing>,
        language: &str,
    ) -> Vec<ThingSummary> {
        things
            .map(|t| ThingSummary::from_thing(t, language))
            .collect()
    }

    fn expand_into(&self, thing: &Thing, visited: &mut HashSet<String>, out: &mut Vec<ConceptId>) {
        if !visited.insert(thing.id().to_string()) {
            return;
        }
        match thing {
            Thing::Concept(concept) => {
                out.push(concept.id.clone());
                for id in &concept.narrower {
                    if let Some(narrower) = self.lookup_id(id) {
                        self.expand_into(narrower, visited, out);
                    }
                }
                for id in &concept.subordinate_arrays {
                    if let Some(array) = self.lookup_id(id) {
                        if matches!(array, Thing::Collection(c) if c.infer_concept_relations) {
                            self.expand_into(array, visited, out);
                        }
                    }
                }
            }
            Thing::Collection(collection) => {
                for id in &collection.members {
                    match self.lookup_id(id) {
                        Some(member) => self.expand_into(member, visited, out),
                        None => trace!(
                            subsystem = "registry",
                            component = "memory_provider",
                            op = "expand",
                            provider = %self.metadata.id,
                            concept_id = %id,
                            "Skipping unknown collection member"
                        ),
                    }
                }
            }
        }
    }

    /// Ids accepted by a collection filter.
    fn collection_scope(&self, id: &str, depth: CollectionDepth) -> Result<HashSet<String>> {
        let thing = self
            .lookup(id)
            .filter(|t| t.kind() == ThingType::Collection)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Collection {} does not exist in provider {}",
                    id, self.metadata.id
                ))
            })?;

        let ids = match depth {
            CollectionDepth::Members => match thing {
                Thing::Collection(c) => c.members.iter().map(|m| m.to_string()).collect(),
                Thing::Concept(_) => HashSet::new(),
            },
            CollectionDepth::All => {
                let mut visited = HashSet::new();
                let mut out = Vec::new();
                self.expand_into(thing, &mut visited, &mut out);
                out.iter().map(|m| m.to_string()).collect()
            }
        };
        Ok(ids)
    }
}

fn label_matches(thing: &Thing, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    thing
        .labels()
        .iter()
        .any(|l| l.label.to_lowercase().contains(&needle))
}

/// Match kinds accepted for a requested kind; `close` also accepts `exact`.
/// An unknown kind accepts nothing.
fn accepted_match_types(requested: Option<&str>) -> Vec<MatchType> {
    match requested {
        None => MatchType::ALL.to_vec(),
        Some(raw) => match raw.parse::<MatchType>() {
            Ok(MatchType::Close) => vec![MatchType::Close, MatchType::Exact],
            Ok(t) => vec![t],
            Err(_) => Vec::new(),
        },
    }
}

impl VocabularyProvider for MemoryProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn concept_scheme(&self) -> &Arc<ConceptScheme> {
        &self.concept_scheme
    }

    fn get_by_id(&self, id: &str) -> Option<Thing> {
        self.lookup(id).cloned()
    }

    fn get_by_uri(&self, uri: &str) -> Option<Thing> {
        self.things.iter().find(|t| t.uri() == Some(uri)).cloned()
    }

    fn get_all(&self, language: &str) -> Vec<ThingSummary> {
        self.summarize(self.things.iter(), language)
    }

    fn find(&self, query: &Query, language: &str) -> Result<Vec<ThingSummary>> {
        let scope = match &query.collection {
            Some(filter) => Some(self.collection_scope(&filter.id, filter.depth)?),
            None => None,
        };
        let match_types = query
            .matches
            .as_ref()
            .map(|m| accepted_match_types(m.match_type.as_deref()));

        let hits = self.things.iter().filter(|thing| {
            if let Some(kind) = query.thing_type {
                if thing.kind() != kind {
                    return false;
                }
            }
            if let Some(label) = &query.label {
                if !label_matches(thing, label) {
                    return false;
                }
            }
            if let Some(scope) = &scope {
                if !scope.contains(&thing.id().to_string()) {
                    return false;
                }
            }
            if let (Some(filter), Some(types)) = (&query.matches, &match_types) {
                let Thing::Concept(concept) = thing else {
                    return false;
                };
                if !types
                    .iter()
                    .any(|t| concept.matches.contains(&filter.uri, Some(*t)))
                {
                    return false;
                }
            }
            true
        });

        let results = self.summarize(hits, language);
        debug!(
            subsystem = "registry",
            component = "memory_provider",
            op = "find",
            provider = %self.metadata.id,
            result_count = results.len(),
            "Find completed"
        );
        Ok(results)
    }

    fn get_top_concepts(&self, language: &str) -> Vec<ThingSummary> {
        let top = self
            .things
            .iter()
            .filter(|t| matches!(t, Thing::Concept(c) if c.broader.is_empty()));
        self.summarize(top, language)
    }

    fn get_top_display(&self, language: &str) -> Vec<ThingSummary> {
        let top = self.things.iter().filter(|t| match t {
            Thing::Concept(c) => c.broader.is_empty() && c.member_of.is_empty(),
            Thing::Collection(c) => c.member_of.is_empty() && c.superordinates.is_empty(),
        });
        self.summarize(top, language)
    }

    fn get_children_display(&self, id: &str, language: &str) -> Option<Vec<ThingSummary>> {
        let children: Vec<&Thing> = match self.lookup(id)? {
            Thing::Concept(c) => c
                .subordinate_arrays
                .iter()
                .chain(c.narrower.iter())
                .filter_map(|id| self.lookup_id(id))
                .collect(),
            Thing::Collection(c) => c.members.iter().filter_map(|id| self.lookup_id(id)).collect(),
        };
        Some(self.summarize(children.into_iter(), language))
    }

    fn expand(&self, id: &str) -> Option<Vec<ConceptId>> {
        let thing = self.lookup(id)?;
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        self.expand_into(thing, &mut visited, &mut out);
        Some(out)
    }
}
