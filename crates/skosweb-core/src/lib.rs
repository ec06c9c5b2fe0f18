//! # skosweb-core
//!
//! Core types, traits, and abstractions for skosweb.
//!
//! This crate provides the SKOS data model, the provider-agnostic query
//! entity and the [`VocabularyProvider`] trait that the registry and the
//! HTTP layer depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod query;
pub mod skos;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use query::{CollectionDepth, CollectionFilter, MatchFilter, ProviderFilter, Query};
pub use skos::*;
pub use traits::{ProviderMetadata, VocabularyProvider};
