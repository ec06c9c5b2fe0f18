//! Centralized default constants for skosweb.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own literals.

// =============================================================================
// LANGUAGE
// =============================================================================

/// Fallback language when neither the request nor the provider names one.
pub const LANGUAGE: &str = "en";

// =============================================================================
// QUERYING
// =============================================================================

/// Default value of the `mode` query parameter.
pub const QUERY_MODE: &str = "default";

/// `mode` value enabling wildcard label semantics for dojo filtering selects.
pub const MODE_DIJIT_FILTERING_SELECT: &str = "dijitFilteringSelect";

/// Wildcard character recognised in label filters.
pub const WILDCARD: char = '*';

// =============================================================================
// PAGING
// =============================================================================

/// Unit of the `Range` / `Content-Range` headers.
pub const RANGE_UNIT: &str = "items";

// =============================================================================
// JSON-LD
// =============================================================================

/// Route serving the static SKOS JSON-LD context document.
pub const JSONLD_CONTEXT_PATH: &str = "/jsonld/context/skos";

/// Path suffix that forces a JSON-LD rendering of a resource.
pub const JSONLD_SUFFIX: &str = ".jsonld";

/// `Cache-Control` max-age for the context document (one day).
pub const JSONLD_CONTEXT_MAX_AGE_SECS: u64 = 86_400;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 6543;

/// Default CORS origin whitelist.
pub const ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;
