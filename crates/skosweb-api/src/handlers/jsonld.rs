//! The static SKOS JSON-LD context document.

use axum::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderMap,
    },
    response::IntoResponse,
};

use skosweb_core::defaults::JSONLD_CONTEXT_MAX_AGE_SECS;
use skosweb_registry::SKOS_CONTEXT;

use super::accept_header;
use crate::negotiation::{negotiate, ResourceKind};

/// Serve the context compiled into the binary. The body is the same for
/// `application/json` and `application/ld+json`; only the content type
/// follows `Accept`.
pub async fn get_context(headers: HeaderMap) -> impl IntoResponse {
    let strategy = negotiate(ResourceKind::Context, accept_header(&headers));
    (
        [
            (CONTENT_TYPE, strategy.content_type().to_string()),
            (
                CACHE_CONTROL,
                format!("public, max-age={}", JSONLD_CONTEXT_MAX_AGE_SECS),
            ),
        ],
        SKOS_CONTEXT,
    )
}
