//! Sorting and paging of listing results.

use tracing::debug;

use skosweb_core::{ConceptId, ThingSummary};

use crate::range::{parse_range_header, PagingDirective};

/// A comparable field value. Missing values sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Null,
    Int(i64),
    Text(String),
}

impl From<&ConceptId> for SortKey {
    fn from(id: &ConceptId) -> Self {
        match id {
            ConceptId::Int(n) => SortKey::Int(*n),
            ConceptId::Str(s) => SortKey::Text(s.clone()),
        }
    }
}

impl From<Option<&str>> for SortKey {
    fn from(value: Option<&str>) -> Self {
        value.map_or(SortKey::Null, |s| SortKey::Text(s.to_string()))
    }
}

/// Results that can be ordered by a named field.
pub trait Sortable {
    /// The value of `field`, or `None` when the field does not exist.
    fn sort_key(&self, field: &str) -> Option<SortKey>;
}

impl Sortable for ThingSummary {
    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "id" => Some(SortKey::from(&self.id)),
            "uri" => Some(SortKey::from(self.uri.as_deref())),
            "type" => Some(SortKey::Text(self.kind.to_string())),
            "label" => Some(SortKey::from(self.label.as_deref())),
            _ => None,
        }
    }
}

/// A parsed `sort` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub descending: bool,
}

impl SortDirective {
    /// `[+|-]field`; the field is trimmed and lower-cased.
    pub fn parse(sort: &str) -> Option<Self> {
        let (descending, rest) = match sort.chars().next()? {
            '-' => (true, &sort[1..]),
            '+' => (false, &sort[1..]),
            _ => (false, sort),
        };
        let field = rest.trim().to_lowercase();
        if field.is_empty() {
            return None;
        }
        Some(Self { field, descending })
    }
}

/// Stable sort of `items` by the `sort` parameter.
///
/// A no-op when the list is empty or its first element lacks the field.
pub fn sort_results<T: Sortable>(items: &mut [T], sort: &str) {
    let Some(directive) = SortDirective::parse(sort) else {
        return;
    };
    let Some(first) = items.first() else {
        return;
    };
    if first.sort_key(&directive.field).is_none() {
        debug!(
            subsystem = "api",
            component = "listing",
            op = "sort",
            field = %directive.field,
            "Sort field not present in results, leaving order unchanged"
        );
        return;
    }

    let key = |item: &T| item.sort_key(&directive.field).unwrap_or(SortKey::Null);
    if directive.descending {
        items.sort_by(|a, b| key(b).cmp(&key(a)));
    } else {
        items.sort_by(|a, b| key(a).cmp(&key(b)));
    }
}

/// One page of a listing together with its `Content-Range` value.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub content_range: String,
}

/// Cut `items` to the window requested by the `Range` header, or return
/// everything when the header is absent or malformed.
pub fn paginate<T: Clone>(items: Vec<T>, range: Option<&str>) -> Page<T> {
    let count = items.len();
    let directive = range
        .and_then(parse_range_header)
        .unwrap_or_else(|| PagingDirective::whole(count));

    Page {
        content_range: directive.content_range(count),
        items: directive.slice(&items).to_vec(),
    }
}
