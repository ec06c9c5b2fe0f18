//! Structured logging schema and field name constants for skosweb.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (dangling relation, deprecated route) |
//! | INFO  | Lifecycle events (startup, dataset loading, shutdown) |
//! | DEBUG | Decision points (ignored Range header, no-op sort, negotiation) |
//! | TRACE | Per-item iteration (relation resolution, filter hits) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "registry"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "renderer", "listing", "memory_provider", "jsonld"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "find", "expand", "map_relations", "parse_range"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Vocabulary id of the provider being queried.
pub const PROVIDER: &str = "provider";

/// Concept scheme id from the request path.
pub const SCHEME_ID: &str = "scheme_id";

/// Concept or collection id.
pub const CONCEPT_ID: &str = "concept_id";

/// URI being resolved.
pub const URI: &str = "uri";

/// Label filter text.
pub const LABEL: &str = "label";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a find or listing.
pub const RESULT_COUNT: &str = "result_count";

/// Number of providers in a registry.
pub const PROVIDER_COUNT: &str = "provider_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
