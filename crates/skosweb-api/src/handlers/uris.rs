//! Resolve a URI to the concept scheme, concept or collection it names.

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skosweb_core::{ConceptId, SchemeRef, ThingType};
use skosweb_registry::Registry;

use crate::error::ApiError;
use crate::registry_scope::SkosRegistry;

/// `?uri=` of `GET /uris`.
#[derive(Debug, Default, Deserialize)]
pub struct UriParams {
    pub uri: Option<String>,
}

/// What a URI resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UriResolution {
    ConceptScheme {
        id: String,
        uri: String,
        #[serde(rename = "type")]
        kind: &'static str,
    },
    Thing {
        id: ConceptId,
        uri: String,
        #[serde(rename = "type")]
        kind: ThingType,
        concept_scheme: SchemeRef,
    },
}

/// Look `uri` up as a concept scheme first, then as an entry of any scheme.
pub fn resolve_uri(registry: &Registry, uri: &str) -> Result<UriResolution, ApiError> {
    if let Some(provider) = registry.get_scheme_by_uri(uri) {
        return Ok(UriResolution::ConceptScheme {
            id: provider.vocabulary_id().to_string(),
            uri: uri.to_string(),
            kind: "concept_scheme",
        });
    }

    let (provider, thing) = registry
        .get_by_uri(uri)
        .ok_or_else(|| ApiError::NotFound(format!("No concept scheme, concept or collection with uri '{}'", uri)))?;
    debug!(
        subsystem = "api",
        component = "uris",
        op = "resolve",
        provider = %provider.vocabulary_id(),
        concept_id = %thing.id(),
        "Resolved uri"
    );
    Ok(UriResolution::Thing {
        id: thing.id().clone(),
        uri: uri.to_string(),
        kind: thing.kind(),
        concept_scheme: SchemeRef {
            id: provider.vocabulary_id().to_string(),
            uri: provider.concept_scheme().uri.clone(),
        },
    })
}

/// Resolve the `uri` query parameter.
///
/// # Returns
/// - 200 OK with `{id, uri, type}` (plus `concept_scheme` for entries)
/// - 400 Bad Request if `uri` is missing
/// - 404 Not Found if nothing carries the uri
pub async fn get_uri(
    SkosRegistry(registry): SkosRegistry,
    Query(params): Query<UriParams>,
) -> Result<Json<UriResolution>, ApiError> {
    let uri = params
        .uri
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Mandatory 'uri' parameter was not passed".to_string()))?;
    Ok(Json(resolve_uri(&registry, &uri)?))
}

/// Resolve a uri embedded in the path. Deprecated in favour of `?uri=`.
pub async fn get_uri_from_path(
    SkosRegistry(registry): SkosRegistry,
    Path(uri): Path<String>,
) -> Result<Json<UriResolution>, ApiError> {
    warn!(
        subsystem = "api",
        component = "uris",
        op = "resolve",
        uri = %uri,
        "The /uris/{{uri}} route is deprecated, pass the uri as a query parameter: /uris?uri=<uri>"
    );
    Ok(Json(resolve_uri(&registry, &uri)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skosweb_registry::test_fixtures::{trees_registry, TREES_URI};

    #[test]
    fn test_resolve_scheme_uri() {
        let resolution = resolve_uri(&trees_registry(), TREES_URI).unwrap();
        assert_eq!(
            serde_json::to_value(resolution).unwrap(),
            serde_json::json!({
                "id": "TREES",
                "uri": TREES_URI,
                "type": "concept_scheme",
            })
        );
    }

    #[test]
    fn test_resolve_concept_uri() {
        let resolution = resolve_uri(&trees_registry(), "http://python.com/trees/larch").unwrap();
        let json = serde_json::to_value(resolution).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "concept");
        assert_eq!(json["concept_scheme"]["id"], "TREES");
        assert_eq!(json["concept_scheme"]["uri"], TREES_URI);
    }

    #[test]
    fn test_unknown_uri_is_not_found() {
        let err = resolve_uri(&trees_registry(), "urn:x-skosweb:nothing").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
