//! JSON vocabulary datasets.
//!
//! A dataset describes one provider:
//!
//! ```json
//! {
//!   "id": "TREES",
//!   "default_language": "nl",
//!   "subject": [],
//!   "concept_scheme": {"uri": "http://python.com/trees", "labels": []},
//!   "entries": [{"id": 1, "uri": "http://python.com/trees/larch", "labels": []}]
//! }
//! ```
//!
//! Entries are concepts unless they carry `"type": "collection"`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use skosweb_core::{
    Collection, Concept, ConceptId, ConceptScheme, Error, Label, Matches, Note, ProviderMetadata,
    Result, Source, Thing, ThingType, VocabularyProvider,
};

use crate::{MemoryProvider, Registry};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    id: String,
    #[serde(default)]
    default_language: Option<String>,
    #[serde(default)]
    subject: Vec<String>,
    concept_scheme: ConceptScheme,
    #[serde(default)]
    entries: Vec<EntryDocument>,
}

#[derive(Debug, Deserialize)]
struct EntryDocument {
    id: ConceptId,
    #[serde(rename = "type", default)]
    kind: ThingType,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    broader: Vec<ConceptId>,
    #[serde(default)]
    narrower: Vec<ConceptId>,
    #[serde(default)]
    related: Vec<ConceptId>,
    #[serde(default)]
    member_of: Vec<ConceptId>,
    #[serde(default)]
    subordinate_arrays: Vec<ConceptId>,
    #[serde(default)]
    matches: Matches,
    #[serde(default)]
    members: Vec<ConceptId>,
    #[serde(default)]
    superordinates: Vec<ConceptId>,
    #[serde(default = "default_true")]
    infer_concept_relations: bool,
}

impl From<EntryDocument> for Thing {
    fn from(entry: EntryDocument) -> Self {
        match entry.kind {
            ThingType::Concept => Thing::Concept(Concept {
                id: entry.id,
                uri: entry.uri,
                labels: entry.labels,
                notes: entry.notes,
                sources: entry.sources,
                broader: entry.broader,
                narrower: entry.narrower,
                related: entry.related,
                member_of: entry.member_of,
                subordinate_arrays: entry.subordinate_arrays,
                matches: entry.matches,
                concept_scheme: None,
            }),
            ThingType::Collection => Thing::Collection(Collection {
                id: entry.id,
                uri: entry.uri,
                labels: entry.labels,
                notes: entry.notes,
                sources: entry.sources,
                members: entry.members,
                member_of: entry.member_of,
                superordinates: entry.superordinates,
                infer_concept_relations: entry.infer_concept_relations,
                concept_scheme: None,
            }),
        }
    }
}

/// Build a provider from the text of a dataset document.
pub fn parse_dataset(text: &str) -> Result<MemoryProvider> {
    let document: DatasetDocument = serde_json::from_str(text)?;

    let mut seen = HashSet::new();
    for entry in &document.entries {
        if !seen.insert(entry.id.to_string()) {
            return Err(Error::Dataset(format!(
                "Duplicate id {} in vocabulary {}",
                entry.id, document.id
            )));
        }
    }

    let metadata = ProviderMetadata {
        id: document.id,
        default_language: document.default_language,
        subject: document.subject,
    };
    let things = document.entries.into_iter().map(Thing::from).collect();
    Ok(MemoryProvider::new(metadata, document.concept_scheme, things))
}

/// Load one dataset file.
pub fn load_dataset(path: &Path) -> Result<MemoryProvider> {
    let text = std::fs::read_to_string(path)?;
    let provider = parse_dataset(&text)
        .map_err(|e| Error::Dataset(format!("{}: {}", path.display(), e)))?;
    info!(
        subsystem = "registry",
        component = "dataset",
        op = "load",
        provider = %provider.vocabulary_id(),
        path = %path.display(),
        entry_count = provider.len(),
        "Loaded vocabulary dataset"
    );
    Ok(provider)
}

/// Load every `*.json` dataset in `dir`, ordered by file name.
pub fn load_dir(dir: &Path) -> Result<Vec<MemoryProvider>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(|p| load_dataset(p)).collect()
}

impl Registry {
    /// A registry holding every dataset found in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut registry = Registry::new();
        for provider in load_dir(dir)? {
            registry.register_provider(Arc::new(provider))?;
        }
        Ok(registry)
    }
}
