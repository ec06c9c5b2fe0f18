//! SKOS data model consumed by the registry and the HTTP layer.
//!
//! Relations between concepts and collections are stored as identifiers,
//! never as embedded objects: resolving `broader`, `members` and friends
//! always goes back through the owning provider.
//!
//! - W3C SKOS Reference: https://www.w3.org/TR/skos-reference/

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Language tag used when a label or note does not declare one.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// Pseudo language that selects the first available label.
pub const ANY_LANGUAGE: &str = "any";

fn default_language() -> String {
    UNDETERMINED_LANGUAGE.to_string()
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a concept or collection, unique within its scheme.
///
/// Datasets use both numeric and textual ids (and refer to numeric ids with
/// strings in relation lists), so equality against request input is done on
/// the textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConceptId {
    Int(i64),
    Str(String),
}

impl ConceptId {
    /// True when the textual form of this id equals `other`.
    pub fn matches(&self, other: &str) -> bool {
        match self {
            Self::Int(n) => n.to_string() == other,
            Self::Str(s) => s == other,
        }
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ConceptId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ConceptId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ConceptId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Kind of a vocabulary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThingType {
    #[default]
    Concept,
    Collection,
}

impl fmt::Display for ThingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept => write!(f, "concept"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

impl std::str::FromStr for ThingType {
    type Err = String;

    /// Exact, case-sensitive: only `concept` and `collection` are types of
    /// entries; anything else (including `conceptscheme`) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concept" => Ok(Self::Concept),
            "collection" => Ok(Self::Collection),
            _ => Err(format!("Invalid thing type: {}", s)),
        }
    }
}

// =============================================================================
// LABELS, NOTES, SOURCES
// =============================================================================

/// SKOS lexical label types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LabelType {
    /// `skos:prefLabel` - Preferred label for display.
    #[default]
    PrefLabel,
    /// `skos:altLabel` - Alternative label (synonym, abbreviation).
    AltLabel,
    /// `skos:hiddenLabel` - Searchable but never displayed.
    HiddenLabel,
    /// Label used only to order entries.
    SortLabel,
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrefLabel => write!(f, "prefLabel"),
            Self::AltLabel => write!(f, "altLabel"),
            Self::HiddenLabel => write!(f, "hiddenLabel"),
            Self::SortLabel => write!(f, "sortLabel"),
        }
    }
}

impl std::str::FromStr for LabelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preflabel" | "pref_label" => Ok(Self::PrefLabel),
            "altlabel" | "alt_label" => Ok(Self::AltLabel),
            "hiddenlabel" | "hidden_label" => Ok(Self::HiddenLabel),
            "sortlabel" | "sort_label" => Ok(Self::SortLabel),
            _ => Err(format!("Invalid SKOS label type: {}", s)),
        }
    }
}

/// A language-tagged label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
    #[serde(rename = "type", default)]
    pub label_type: LabelType,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Label {
    pub fn new(label: impl Into<String>, label_type: LabelType, language: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            label_type,
            language: language.into(),
        }
    }
}

/// SKOS documentation note types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum NoteType {
    Definition,
    ScopeNote,
    Example,
    HistoryNote,
    EditorialNote,
    ChangeNote,
    #[default]
    Note,
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Definition => write!(f, "definition"),
            Self::ScopeNote => write!(f, "scopeNote"),
            Self::Example => write!(f, "example"),
            Self::HistoryNote => write!(f, "historyNote"),
            Self::EditorialNote => write!(f, "editorialNote"),
            Self::ChangeNote => write!(f, "changeNote"),
            Self::Note => write!(f, "note"),
        }
    }
}

/// A documentation note, optionally carrying rich-text markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note: String,
    #[serde(rename = "type", default)]
    pub note_type: NoteType,
    #[serde(default = "default_language")]
    pub language: String,
    /// Markup language of `note` (e.g. "HTML"), `None` for plain text.
    #[serde(default)]
    pub markup: Option<String>,
}

/// A bibliographic source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub citation: String,
    #[serde(default)]
    pub markup: Option<String>,
}

impl Source {
    pub fn new(citation: impl Into<String>, markup: Option<&str>) -> Self {
        Self {
            citation: citation.into(),
            markup: markup.map(String::from),
        }
    }
}

// =============================================================================
// MATCHES
// =============================================================================

/// SKOS mapping relation kinds towards external vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Broad,
    Close,
    Exact,
    Narrow,
    Related,
}

impl MatchType {
    pub const ALL: [MatchType; 5] = [
        Self::Broad,
        Self::Close,
        Self::Exact,
        Self::Narrow,
        Self::Related,
    ];
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broad => write!(f, "broad"),
            Self::Close => write!(f, "close"),
            Self::Exact => write!(f, "exact"),
            Self::Narrow => write!(f, "narrow"),
            Self::Related => write!(f, "related"),
        }
    }
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "broad" | "broadmatch" => Ok(Self::Broad),
            "close" | "closematch" => Ok(Self::Close),
            "exact" | "exactmatch" => Ok(Self::Exact),
            "narrow" | "narrowmatch" => Ok(Self::Narrow),
            "related" | "relatedmatch" => Ok(Self::Related),
            _ => Err(format!("Invalid SKOS match type: {}", s)),
        }
    }
}

/// External match URIs per match kind. Always serialized with all five keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matches {
    #[serde(default)]
    pub broad: Vec<String>,
    #[serde(default)]
    pub close: Vec<String>,
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub narrow: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
}

impl Matches {
    pub fn get(&self, match_type: MatchType) -> &[String] {
        match match_type {
            MatchType::Broad => &self.broad,
            MatchType::Close => &self.close,
            MatchType::Exact => &self.exact,
            MatchType::Narrow => &self.narrow,
            MatchType::Related => &self.related,
        }
    }

    /// True when `uri` appears under `match_type`, or under any kind when
    /// `match_type` is `None`.
    pub fn contains(&self, uri: &str, match_type: Option<MatchType>) -> bool {
        match match_type {
            Some(t) => self.get(t).iter().any(|u| u == uri),
            None => MatchType::ALL
                .iter()
                .any(|t| self.get(*t).iter().any(|u| u == uri)),
        }
    }
}

// =============================================================================
// LABEL SELECTION
// =============================================================================

fn primary_subtag(language: &str) -> &str {
    language.split('-').next().unwrap_or(language)
}

fn best_label_of_type<'a>(
    labels: &'a [Label],
    language: &str,
    label_type: LabelType,
) -> Option<&'a Label> {
    let mut typed = labels.iter().filter(|l| l.label_type == label_type);
    if language == ANY_LANGUAGE {
        return typed.next();
    }
    let typed: Vec<&Label> = typed.collect();
    typed
        .iter()
        .find(|l| l.language.eq_ignore_ascii_case(language))
        .or_else(|| {
            typed.iter().find(|l| {
                primary_subtag(&l.language).eq_ignore_ascii_case(primary_subtag(language))
            })
        })
        .copied()
}

/// The label for `language` only: prefLabel in the language (exact tag,
/// then primary subtag), else altLabel in the language.
pub fn select_label_in_language<'a>(labels: &'a [Label], language: &str) -> Option<&'a Label> {
    best_label_of_type(labels, language, LabelType::PrefLabel)
        .or_else(|| best_label_of_type(labels, language, LabelType::AltLabel))
}

/// Pick the display label for `language`.
///
/// When the language has no pref or alt label, the first prefLabel and then
/// the first altLabel of any language are used.
pub fn select_label<'a>(labels: &'a [Label], language: &str) -> Option<&'a Label> {
    select_label_in_language(labels, language)
        .or_else(|| best_label_of_type(labels, ANY_LANGUAGE, LabelType::PrefLabel))
        .or_else(|| best_label_of_type(labels, ANY_LANGUAGE, LabelType::AltLabel))
}

// =============================================================================
// ENTITIES
// =============================================================================

/// A concept scheme: the namespace owning concepts and collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptScheme {
    pub uri: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl ConceptScheme {
    pub fn new(uri: impl Into<String>, labels: Vec<Label>) -> Self {
        Self {
            uri: uri.into(),
            labels,
            ..Default::default()
        }
    }

    pub fn label(&self, language: &str) -> Option<&Label> {
        select_label(&self.labels, language)
    }
}

/// An atomic vocabulary term.
#[derive(Debug, Clone, Default)]
pub struct Concept {
    pub id: ConceptId,
    pub uri: Option<String>,
    pub labels: Vec<Label>,
    pub notes: Vec<Note>,
    pub sources: Vec<Source>,
    pub broader: Vec<ConceptId>,
    pub narrower: Vec<ConceptId>,
    pub related: Vec<ConceptId>,
    pub member_of: Vec<ConceptId>,
    pub subordinate_arrays: Vec<ConceptId>,
    pub matches: Matches,
    /// Scheme this concept belongs to; set by the provider that owns it.
    pub concept_scheme: Option<Arc<ConceptScheme>>,
}

/// A named grouping of concepts and/or collections.
#[derive(Debug, Clone)]
pub struct Collection {
    pub id: ConceptId,
    pub uri: Option<String>,
    pub labels: Vec<Label>,
    pub notes: Vec<Note>,
    pub sources: Vec<Source>,
    pub members: Vec<ConceptId>,
    pub member_of: Vec<ConceptId>,
    pub superordinates: Vec<ConceptId>,
    pub infer_concept_relations: bool,
    pub concept_scheme: Option<Arc<ConceptScheme>>,
}

impl Default for ConceptId {
    fn default() -> Self {
        Self::Str(String::new())
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            id: ConceptId::default(),
            uri: None,
            labels: Vec::new(),
            notes: Vec::new(),
            sources: Vec::new(),
            members: Vec::new(),
            member_of: Vec::new(),
            superordinates: Vec::new(),
            infer_concept_relations: true,
            concept_scheme: None,
        }
    }
}

/// Either kind of vocabulary entry.
#[derive(Debug, Clone)]
pub enum Thing {
    Concept(Concept),
    Collection(Collection),
}

impl Thing {
    pub fn id(&self) -> &ConceptId {
        match self {
            Self::Concept(c) => &c.id,
            Self::Collection(c) => &c.id,
        }
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Concept(c) => c.uri.as_deref(),
            Self::Collection(c) => c.uri.as_deref(),
        }
    }

    pub fn kind(&self) -> ThingType {
        match self {
            Self::Concept(_) => ThingType::Concept,
            Self::Collection(_) => ThingType::Collection,
        }
    }

    pub fn labels(&self) -> &[Label] {
        match self {
            Self::Concept(c) => &c.labels,
            Self::Collection(c) => &c.labels,
        }
    }

    pub fn concept_scheme(&self) -> Option<&Arc<ConceptScheme>> {
        match self {
            Self::Concept(c) => c.concept_scheme.as_ref(),
            Self::Collection(c) => c.concept_scheme.as_ref(),
        }
    }

    pub fn label(&self, language: &str) -> Option<&Label> {
        select_label(self.labels(), language)
    }
}

impl From<Concept> for Thing {
    fn from(c: Concept) -> Self {
        Self::Concept(c)
    }
}

impl From<Collection> for Thing {
    fn from(c: Collection) -> Self {
        Self::Collection(c)
    }
}

/// `{id, uri}` reference to the scheme a search hit came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRef {
    pub id: String,
    pub uri: String,
}

/// Shallow projection of an entry as returned by find and listing operations.
///
/// Relations are left out on purpose; a summary never references other
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingSummary {
    pub id: ConceptId,
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub kind: ThingType,
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub concept_scheme: Option<SchemeRef>,
}

impl ThingSummary {
    pub fn from_thing(thing: &Thing, language: &str) -> Self {
        Self {
            id: thing.id().clone(),
            uri: thing.uri().map(String::from),
            kind: thing.kind(),
            label: thing.label(language).map(|l| l.label.clone()),
            concept_scheme: None,
        }
    }

    pub fn with_scheme(mut self, scheme: SchemeRef) -> Self {
        self.concept_scheme = Some(scheme);
        self
    }
}
