//! Concept and collection handlers: listings, single entries and the
//! display tree.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde_json::Value as JsonValue;
use tracing::debug;

use skosweb_core::{ConceptId, SchemeRef, ThingSummary, VocabularyProvider};
use skosweb_registry::dump_summary;

use super::{
    accept_header, find_provider, negotiated, paged, provider_language, range_header,
    strip_jsonld_suffix, with_leading_context, LanguageParams,
};
use crate::error::ApiError;
use crate::listing::{paginate, sort_results, Page};
use crate::negotiation::{negotiate, ResourceKind, SerializationStrategy};
use crate::query_builder::{build_query, BuiltQuery, ListingParams};
use crate::registry_scope::SkosRegistry;
use crate::renderers::RenderContext;
use crate::wildcard::filter_wildcard;
use crate::AppState;

// =============================================================================
// LISTING PIPELINE
// =============================================================================

/// Wildcard refinement and sorting of provider results.
fn refine(built: &BuiltQuery, params: &ListingParams, mut results: Vec<ThingSummary>) -> Vec<ThingSummary> {
    if built.postprocess {
        if let Some(label) = params.label.as_deref() {
            results = filter_wildcard(label, results);
        }
    }
    if let Some(sort) = params.sort.as_deref() {
        sort_results(&mut results, sort);
    }
    results
}

fn listing_response(
    results: Vec<ThingSummary>,
    headers: &HeaderMap,
    context: &JsonValue,
) -> Result<Response, ApiError> {
    let strategy = negotiate(ResourceKind::ThingList, accept_header(headers));
    let page = paginate(results, range_header(headers));

    let items = match strategy {
        SerializationStrategy::Json => page
            .items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?,
        SerializationStrategy::JsonLd => with_leading_context(&page.items, context, |summary, ctx| {
            Ok(serde_json::to_value(dump_summary(summary, ctx))?)
        })?,
    };

    Ok(paged(
        strategy,
        Page {
            items,
            content_range: page.content_range,
        },
    ))
}

fn scheme_ref(provider: &dyn VocabularyProvider) -> SchemeRef {
    SchemeRef {
        id: provider.vocabulary_id().to_string(),
        uri: provider.concept_scheme().uri.clone(),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// List or search the concepts and collections of one scheme.
///
/// # Query Parameters
/// - `type`, `label`, `mode`, `collection`, `match`, `match_type`: filters
/// - `sort`: `[+|-]field`
/// - `language`: label language (defaults to the provider's language)
///
/// # Headers
/// - `Range: items=<start>-<finish>` selects a page; the response carries
///   `Content-Range: items <start>-<finish>/<count>`
///
/// # Returns
/// - 200 OK with `[{id, uri, type, label}]`
/// - 400 Bad Request for an unknown `collection`
/// - 404 Not Found for an unknown scheme
pub async fn list_concepts(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Path(scheme_id): Path<String>,
    Query(params): Query<ListingParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let provider = find_provider(&registry, &scheme_id)?;
    let built = build_query(&params);

    let language =
        provider_language(params.language.as_deref(), provider.as_ref(), &state.default_language);
    let results = if built.no_result {
        Vec::new()
    } else if built.query.is_empty() {
        provider.get_all(language)
    } else {
        provider.find(&built.query, language)?
    };
    let results = refine(&built, &params, results);

    debug!(
        subsystem = "api",
        component = "concepts",
        op = "list",
        scheme_id = %scheme_id,
        result_count = results.len(),
        "Listed concepts"
    );
    listing_response(results, &headers, &state.jsonld_context)
}

/// Search concepts and collections across every selected provider.
///
/// Takes the listing parameters plus `providers.ids` (comma separated) and
/// `providers.subject`. Each hit names its concept scheme.
pub async fn search_concepts(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Query(params): Query<ListingParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let built = build_query(&params);

    let results = if built.no_result {
        Vec::new()
    } else {
        registry
            .find(&built.query, &params.provider_filter(), params.language.as_deref())?
            .into_iter()
            .flat_map(|group| {
                let scheme = scheme_ref(group.provider.as_ref());
                group
                    .results
                    .into_iter()
                    .map(move |summary| summary.with_scheme(scheme.clone()))
            })
            .collect()
    };
    let results = refine(&built, &params, results);

    debug!(
        subsystem = "api",
        component = "concepts",
        op = "search",
        result_count = results.len(),
        "Searched all providers"
    );
    listing_response(results, &headers, &state.jsonld_context)
}

/// Get a concept or collection.
///
/// # Path Parameters
/// - `scheme_id`: vocabulary id or scheme URI
/// - `c_id`: entry id; a `.jsonld` suffix forces JSON-LD
///
/// # Returns
/// - 200 OK with the rendered entry
/// - 404 Not Found for an unknown scheme or entry
pub async fn get_concept(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Path((scheme_id, c_id)): Path<(String, String)>,
    Query(params): Query<LanguageParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (c_id, force_jsonld) = strip_jsonld_suffix(&c_id);
    let provider = find_provider(&registry, &scheme_id)?;
    let thing = provider.get_by_id(c_id).ok_or_else(|| {
        ApiError::NotFound(format!(
            "Concept or collection '{}' not found in '{}'",
            c_id, scheme_id
        ))
    })?;

    let strategy = if force_jsonld {
        SerializationStrategy::JsonLd
    } else {
        negotiate(ResourceKind::Thing, accept_header(&headers))
    };
    let ctx = RenderContext {
        registry: &registry,
        language: provider_language(
            params.language.as_deref(),
            provider.as_ref(),
            &state.default_language,
        ),
        jsonld_context: &state.jsonld_context,
    };
    let body = state.renderers.render(&thing, strategy, &ctx)?;
    Ok(negotiated(strategy, body))
}

/// Display-ordered children of a concept or collection.
///
/// # Returns
/// - 200 OK with `[{id, uri, type, label}]`
/// - 404 Not Found for an unknown scheme or entry
pub async fn get_display_children(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Path((scheme_id, c_id)): Path<(String, String)>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<Vec<ThingSummary>>, ApiError> {
    let provider = find_provider(&registry, &scheme_id)?;
    let language =
        provider_language(params.language.as_deref(), provider.as_ref(), &state.default_language);
    provider
        .get_children_display(&c_id, language)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Concept or collection '{}' not found", c_id)))
}

/// Ids of an entry and everything narrower than it.
///
/// # Returns
/// - 200 OK with a list of ids
/// - 404 Not Found for an unknown scheme or entry
pub async fn expand_concept(
    SkosRegistry(registry): SkosRegistry,
    Path((scheme_id, c_id)): Path<(String, String)>,
) -> Result<Json<Vec<ConceptId>>, ApiError> {
    let provider = find_provider(&registry, &scheme_id)?;
    provider
        .expand(&c_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Concept or collection '{}' not found", c_id)))
}
