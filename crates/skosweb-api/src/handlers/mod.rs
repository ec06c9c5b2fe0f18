//! HTTP handlers for skosweb-api.
//!
//! Every handler reads from the request's [`SkosRegistry`](crate::registry_scope::SkosRegistry);
//! none of them mutate it.

pub mod concepts;
pub mod conceptschemes;
pub mod jsonld;
pub mod uris;

use axum::http::header::{ACCEPT, CONTENT_RANGE, CONTENT_TYPE, RANGE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use skosweb_core::defaults::JSONLD_SUFFIX;
use skosweb_core::VocabularyProvider;
use skosweb_registry::{ProviderRef, Registry};

use crate::error::ApiError;
use crate::listing::Page;
use crate::negotiation::SerializationStrategy;

/// `?language=` on endpoints that take nothing else.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageParams {
    pub language: Option<String>,
}

pub(crate) fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(ACCEPT).and_then(|v| v.to_str().ok())
}

pub(crate) fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(RANGE).and_then(|v| v.to_str().ok())
}

/// Split a trailing `.jsonld` off a path segment.
pub(crate) fn strip_jsonld_suffix(segment: &str) -> (&str, bool) {
    match segment.strip_suffix(JSONLD_SUFFIX) {
        Some(id) => (id, true),
        None => (segment, false),
    }
}

/// Label language for a provider-scoped request: the `language` parameter,
/// the provider's default, then the configured fallback.
pub(crate) fn provider_language<'a>(
    requested: Option<&'a str>,
    provider: &'a dyn VocabularyProvider,
    fallback: &'a str,
) -> &'a str {
    requested
        .filter(|l| !l.is_empty())
        .or_else(|| provider.default_language())
        .unwrap_or(fallback)
}

pub(crate) fn find_provider(registry: &Registry, scheme_id: &str) -> Result<ProviderRef, ApiError> {
    registry
        .get_provider(scheme_id)
        .ok_or_else(|| ApiError::NotFound(format!("Concept scheme '{}' not found", scheme_id)))
}

/// A JSON body with the content type of the chosen serialization.
pub(crate) fn negotiated(strategy: SerializationStrategy, body: JsonValue) -> Response {
    ([(CONTENT_TYPE, strategy.content_type())], Json(body)).into_response()
}

/// A listing page with its `Content-Range` header.
pub(crate) fn paged(strategy: SerializationStrategy, page: Page<JsonValue>) -> Response {
    (
        [
            (CONTENT_TYPE, strategy.content_type().to_string()),
            (CONTENT_RANGE, page.content_range),
        ],
        Json(JsonValue::Array(page.items)),
    )
        .into_response()
}

/// Attach the JSON-LD context to the first element of a listing only.
pub(crate) fn with_leading_context<T, F>(
    items: &[T],
    context: &JsonValue,
    mut dump: F,
) -> Result<Vec<JsonValue>, ApiError>
where
    F: FnMut(&T, Option<JsonValue>) -> Result<JsonValue, ApiError>,
{
    items
        .iter()
        .enumerate()
        .map(|(index, item)| dump(item, (index == 0).then(|| context.clone())))
        .collect()
}
