//! # skosweb-api
//!
//! HTTP API exposing a SKOS vocabulary registry as JSON and JSON-LD.
//!
//! [`router`] wires the handlers; [`build_app`] adds request tracing,
//! request ids and CORS on top and binds the [`AppState`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod negotiation;
pub mod query_builder;
pub mod range;
pub mod registry_scope;
pub mod renderers;
pub mod wildcard;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use serde_json::Value as JsonValue;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use skosweb_core::defaults::{CORS_MAX_AGE_SECS, JSONLD_CONTEXT_PATH};

pub use config::ApiConfig;
pub use error::ApiError;
pub use registry_scope::{
    GlobalRegistryProvider, PerRequestRegistryProvider, RegistryFactory, RegistryProvider,
    RegistryScope, SkosRegistry,
};
pub use renderers::RendererTable;

use handlers::{concepts, conceptschemes, jsonld, uris};

// =============================================================================
// STATE
// =============================================================================

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry_provider: Arc<dyn RegistryProvider>,
    pub renderers: Arc<RendererTable>,
    /// `@context` value placed in JSON-LD documents.
    pub jsonld_context: Arc<JsonValue>,
    pub default_language: String,
}

impl AppState {
    pub fn new(
        config: &ApiConfig,
        registry_provider: Arc<dyn RegistryProvider>,
    ) -> skosweb_core::Result<Self> {
        Ok(Self {
            registry_provider,
            renderers: Arc::new(RendererTable::new()),
            jsonld_context: Arc::new(config.context_mode.context_value(&config.public_url)?),
            default_language: config.default_language.clone(),
        })
    }
}

// =============================================================================
// ROUTING
// =============================================================================

/// UUIDv7 request ids, time-ordered for log correlation.
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Routes without middleware or state.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conceptschemes", get(conceptschemes::list_conceptschemes))
        .route(
            "/conceptschemes/:scheme_id",
            get(conceptschemes::get_conceptscheme),
        )
        .route(
            "/conceptschemes/:scheme_id/topconcepts",
            get(conceptschemes::get_top_concepts),
        )
        .route(
            "/conceptschemes/:scheme_id/displaytop",
            get(conceptschemes::get_top_display),
        )
        .route("/conceptschemes/:scheme_id/c", get(concepts::list_concepts))
        .route(
            "/conceptschemes/:scheme_id/c/:c_id",
            get(concepts::get_concept),
        )
        .route(
            "/conceptschemes/:scheme_id/c/:c_id/displaychildren",
            get(concepts::get_display_children),
        )
        .route(
            "/conceptschemes/:scheme_id/c/:c_id/expand",
            get(concepts::expand_concept),
        )
        .route("/c", get(concepts::search_concepts))
        .route("/uris", get(uris::get_uri))
        .route("/uris/*uri", get(uris::get_uri_from_path))
        .route(JSONLD_CONTEXT_PATH, get(jsonld::get_context))
}

fn cors_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

/// The full application: routes, tracing, request ids and CORS.
pub fn build_app(state: AppState, config: &ApiConfig) -> Router {
    router()
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins(&config.allowed_origins)))
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::RANGE])
                .expose_headers([header::CONTENT_RANGE])
                .max_age(Duration::from_secs(CORS_MAX_AGE_SECS)),
        )
        .with_state(state)
}
