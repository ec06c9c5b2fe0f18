//! # skosweb-registry
//!
//! In-memory vocabulary registry for skosweb.
//!
//! Providers are loaded from JSON datasets (or built in code), collected in
//! a [`Registry`] and queried read-only by the HTTP layer. The crate also
//! owns the JSON-LD dumper and the SKOS context document it refers to.

pub mod dataset;
pub mod jsonld;
pub mod memory;
pub mod registry;
pub mod test_fixtures;

pub use dataset::{load_dataset, load_dir, parse_dataset};
pub use jsonld::{
    dump_concept_scheme, dump_scheme_summary, dump_summary, dump_thing, inline_context,
    JsonLdDocument, SKOS_CONTEXT,
};
pub use memory::MemoryProvider;
pub use registry::{ProviderRef, ProviderResults, Registry};
