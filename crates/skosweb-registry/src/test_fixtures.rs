//! Test fixtures shared by the registry and API test suites.
//!
//! The TREES vocabulary: two concepts (larch and chestnut) and one
//! collection grouping them. The same data ships as `data/trees.json` at the
//! repository root.
//!
//! ## Usage
//!
//! ```rust
//! use skosweb_registry::test_fixtures::{trees, trees_registry};
//! use skosweb_core::VocabularyProvider;
//!
//! let provider = trees();
//! assert_eq!(provider.vocabulary_id(), "TREES");
//! assert_eq!(trees_registry().get_providers(&Default::default()).len(), 1);
//! ```

use std::sync::Arc;

use skosweb_core::{
    Collection, Concept, ConceptId, ConceptScheme, Label, LabelType, Matches, Note, NoteType,
    ProviderMetadata, Source, Thing,
};

use crate::{MemoryProvider, Registry};

/// Concept scheme URI of the TREES vocabulary.
pub const TREES_URI: &str = "http://python.com/trees";

fn label(text: &str, label_type: LabelType, language: &str) -> Label {
    Label::new(text, label_type, language)
}

fn note(text: &str, note_type: NoteType) -> Note {
    Note {
        note: text.to_string(),
        note_type,
        language: "en".to_string(),
        markup: None,
    }
}

pub fn larch() -> Concept {
    Concept {
        id: ConceptId::Int(1),
        uri: Some(format!("{}/larch", TREES_URI)),
        labels: vec![
            label("The Larch", LabelType::PrefLabel, "en"),
            label("De Lariks", LabelType::PrefLabel, "nl"),
            label("c", LabelType::SortLabel, "nl"),
        ],
        notes: vec![note("A type of tree.", NoteType::Definition)],
        sources: vec![Source::new(
            "Monthy Python. Episode Three: How to recognise different types of trees from quite a long way away.",
            None,
        )],
        matches: Matches {
            close: vec!["http://id.python.org/different/types/of/trees/nr/1/the/larch".to_string()],
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn chestnut() -> Concept {
    Concept {
        id: ConceptId::Int(2),
        uri: Some(format!("{}/chestnut", TREES_URI)),
        labels: vec![
            label("The Chestnut", LabelType::PrefLabel, "en"),
            label("De Paardekastanje", LabelType::AltLabel, "nl"),
            label("a", LabelType::SortLabel, "nl"),
        ],
        notes: vec![note("A different type of tree.", NoteType::Definition)],
        matches: Matches {
            related: vec![
                "http://id.python.org/different/types/of/trees/nr/17/the/other/chestnut"
                    .to_string(),
            ],
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn species() -> Collection {
    Collection {
        id: ConceptId::Int(3),
        uri: Some(format!("{}/species", TREES_URI)),
        labels: vec![
            label("Trees by species", LabelType::PrefLabel, "en"),
            label("Trees by their species", LabelType::AltLabel, "en"),
            label("Bomen per soort", LabelType::PrefLabel, "nl"),
            label("b", LabelType::PrefLabel, "nl"),
        ],
        notes: vec![note("A division of trees.", NoteType::ScopeNote)],
        members: vec![ConceptId::from("1"), ConceptId::from("2")],
        ..Default::default()
    }
}

pub fn trees_scheme() -> ConceptScheme {
    ConceptScheme::new(
        TREES_URI,
        vec![
            label("Different types of trees", LabelType::PrefLabel, "en"),
            label("Verschillende soorten bomen", LabelType::PrefLabel, "nl"),
        ],
    )
}

/// The TREES provider (default language `nl`).
pub fn trees() -> MemoryProvider {
    MemoryProvider::new(
        ProviderMetadata {
            id: "TREES".to_string(),
            default_language: Some("nl".to_string()),
            subject: Vec::new(),
        },
        trees_scheme(),
        vec![
            Thing::from(larch()),
            Thing::from(chestnut()),
            Thing::from(species()),
        ],
    )
}

/// A registry holding only the TREES provider.
pub fn trees_registry() -> Registry {
    let mut registry = Registry::new();
    // A fresh registry cannot hold a duplicate.
    let _ = registry.register_provider(Arc::new(trees()));
    registry
}
