//! Concept scheme handlers.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use skosweb_core::{Label, Note, Source, ThingSummary, VocabularyProvider};
use skosweb_registry::{dump_concept_scheme, dump_scheme_summary};

use super::{
    accept_header, find_provider, negotiated, provider_language, strip_jsonld_suffix,
    with_leading_context, LanguageParams,
};
use crate::error::ApiError;
use crate::negotiation::{negotiate, ResourceKind, SerializationStrategy};
use crate::registry_scope::SkosRegistry;
use crate::AppState;

/// One entry of `GET /conceptschemes`.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptSchemeListItem {
    pub id: String,
    pub uri: String,
    pub label: Option<String>,
    pub subject: Vec<String>,
}

/// Body of `GET /conceptschemes/{scheme_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptSchemeDetail {
    pub id: String,
    pub uri: String,
    pub label: Option<String>,
    pub subject: Vec<String>,
    pub labels: Vec<Label>,
    pub notes: Vec<Note>,
    pub sources: Vec<Source>,
    pub languages: Vec<String>,
}

fn scheme_label(provider: &dyn VocabularyProvider, language: &str) -> Option<String> {
    provider
        .concept_scheme()
        .label(language)
        .map(|l| l.label.clone())
}

/// List every registered concept scheme.
///
/// # Query Parameters
/// - `language`: label language (defaults to each provider's own default
///   language, then the configured one)
///
/// # Returns
/// - 200 OK with `[{id, uri, label, subject}]`, or JSON-LD summaries
pub async fn list_conceptschemes(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Query(params): Query<LanguageParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let requested = params.language.as_deref();
    let providers = registry.get_providers(&Default::default());
    let strategy = negotiate(ResourceKind::ConceptSchemeList, accept_header(&headers));

    let body = match strategy {
        SerializationStrategy::Json => {
            let items: Vec<ConceptSchemeListItem> = providers
                .iter()
                .map(|p| ConceptSchemeListItem {
                    id: p.vocabulary_id().to_string(),
                    uri: p.concept_scheme().uri.clone(),
                    label: scheme_label(
                        p.as_ref(),
                        provider_language(requested, p.as_ref(), &state.default_language),
                    ),
                    subject: p.metadata().subject.clone(),
                })
                .collect();
            serde_json::to_value(items)?
        }
        SerializationStrategy::JsonLd => JsonValue::Array(with_leading_context(
            &providers,
            &state.jsonld_context,
            |p, context| {
                let language = provider_language(requested, p.as_ref(), &state.default_language);
                Ok(serde_json::to_value(dump_scheme_summary(p.as_ref(), language, context))?)
            },
        )?),
    };

    debug!(
        subsystem = "api",
        component = "conceptschemes",
        op = "list",
        result_count = providers.len(),
        "Listed concept schemes"
    );
    Ok(negotiated(strategy, body))
}

/// Get one concept scheme.
///
/// # Path Parameters
/// - `scheme_id`: vocabulary id or scheme URI; a `.jsonld` suffix forces JSON-LD
///
/// # Returns
/// - 200 OK with the scheme detail or its JSON-LD dump
/// - 404 Not Found if no provider answers to `scheme_id`
pub async fn get_conceptscheme(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Path(scheme_id): Path<String>,
    Query(params): Query<LanguageParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (scheme_id, force_jsonld) = strip_jsonld_suffix(&scheme_id);
    let provider = find_provider(&registry, scheme_id)?;
    let strategy = if force_jsonld {
        SerializationStrategy::JsonLd
    } else {
        negotiate(ResourceKind::ConceptScheme, accept_header(&headers))
    };

    let body = match strategy {
        SerializationStrategy::Json => {
            let language =
                provider_language(params.language.as_deref(), provider.as_ref(), &state.default_language);
            let scheme = provider.concept_scheme();
            serde_json::to_value(ConceptSchemeDetail {
                id: provider.vocabulary_id().to_string(),
                uri: scheme.uri.clone(),
                label: scheme_label(provider.as_ref(), language),
                subject: provider.metadata().subject.clone(),
                labels: scheme.labels.clone(),
                notes: scheme.notes.clone(),
                sources: scheme.sources.clone(),
                languages: scheme.languages.clone(),
            })?
        }
        SerializationStrategy::JsonLd => serde_json::to_value(dump_concept_scheme(
            provider.as_ref(),
            Some((*state.jsonld_context).clone()),
        ))?,
    };
    Ok(negotiated(strategy, body))
}

/// Top concepts of a scheme.
///
/// # Returns
/// - 200 OK with `[{id, uri, type, label}]`
/// - 404 Not Found for an unknown scheme
pub async fn get_top_concepts(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Path(scheme_id): Path<String>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<Vec<ThingSummary>>, ApiError> {
    let provider = find_provider(&registry, &scheme_id)?;
    let language =
        provider_language(params.language.as_deref(), provider.as_ref(), &state.default_language);
    Ok(Json(provider.get_top_concepts(language)))
}

/// Display-ordered top level of a scheme: top concepts plus top collections.
///
/// # Returns
/// - 200 OK with `[{id, uri, type, label}]`
/// - 404 Not Found for an unknown scheme
pub async fn get_top_display(
    State(state): State<AppState>,
    SkosRegistry(registry): SkosRegistry,
    Path(scheme_id): Path<String>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<Vec<ThingSummary>>, ApiError> {
    let provider = find_provider(&registry, &scheme_id)?;
    let language =
        provider_language(params.language.as_deref(), provider.as_ref(), &state.default_language);
    Ok(Json(provider.get_top_display(language)))
}
