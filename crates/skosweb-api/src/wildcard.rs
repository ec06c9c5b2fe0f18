//! Wildcard refinement of provider results for filtering-select mode.
//!
//! The provider only saw the label with its `*` removed; the position of
//! the wildcard decides whether a hit must start with, end with or contain
//! that text.

use skosweb_core::defaults::WILDCARD;
use skosweb_core::ThingSummary;

/// Anything carrying a display label.
pub trait Labelled {
    fn display_label(&self) -> Option<&str>;
}

impl Labelled for ThingSummary {
    fn display_label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EdgeMatch {
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

fn edge_match(label: &str) -> Option<EdgeMatch> {
    let lead = label.strip_prefix(WILDCARD);
    let trail = label.strip_suffix(WILDCARD);
    match (lead, trail) {
        (Some(rest), Some(_)) => Some(EdgeMatch::Contains(
            rest.strip_suffix(WILDCARD).unwrap_or("").to_lowercase(),
        )),
        (None, Some(prefix)) => Some(EdgeMatch::StartsWith(prefix.to_lowercase())),
        (Some(suffix), None) => Some(EdgeMatch::EndsWith(suffix.to_lowercase())),
        (None, None) => None,
    }
}

/// Keep the items whose label satisfies the wildcard at the edges of
/// `label`, comparing case-insensitively. Without an edge wildcard the items
/// are returned untouched.
pub fn filter_wildcard<T: Labelled>(label: &str, items: Vec<T>) -> Vec<T> {
    let Some(rule) = edge_match(label) else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| {
            let Some(text) = item.display_label() else {
                return false;
            };
            let text = text.to_lowercase();
            match &rule {
                EdgeMatch::Contains(inner) => text.contains(inner.as_str()),
                EdgeMatch::StartsWith(prefix) => text.starts_with(prefix.as_str()),
                EdgeMatch::EndsWith(suffix) => text.ends_with(suffix.as_str()),
            }
        })
        .collect()
}
