//! Registry of vocabulary providers, addressable by vocabulary id or by
//! concept scheme URI.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use skosweb_core::{
    defaults, Error, ProviderFilter, Query, Result, Thing, ThingSummary, VocabularyProvider,
};

/// Shared handle to a provider.
pub type ProviderRef = Arc<dyn VocabularyProvider>;

/// Results of a cross-provider search for one provider.
pub struct ProviderResults {
    pub provider: ProviderRef,
    pub results: Vec<ThingSummary>,
}

/// An ordered set of providers.
///
/// Built once (at start-up, or per request for request-scoped registries)
/// and read without locking afterwards.
#[derive(Clone, Default)]
pub struct Registry {
    providers: Vec<ProviderRef>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "providers",
                &self
                    .providers
                    .iter()
                    .map(|p| p.vocabulary_id())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn provider_answers_to(provider: &dyn VocabularyProvider, id_or_uri: &str) -> bool {
    provider.vocabulary_id() == id_or_uri || provider.concept_scheme().uri == id_or_uri
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Add a provider. Vocabulary ids and scheme URIs must stay unique.
    pub fn register_provider(&mut self, provider: ProviderRef) -> Result<()> {
        let id = provider.vocabulary_id().to_string();
        let uri = provider.concept_scheme().uri.clone();

        if self.providers.iter().any(|p| p.vocabulary_id() == id) {
            return Err(Error::Dataset(format!(
                "A provider with id {} is already registered",
                id
            )));
        }
        if self.providers.iter().any(|p| p.concept_scheme().uri == uri) {
            return Err(Error::Dataset(format!(
                "A provider for concept scheme {} is already registered",
                uri
            )));
        }

        info!(
            subsystem = "registry",
            component = "registry",
            op = "register_provider",
            provider = %id,
            uri = %uri,
            "Registered vocabulary provider"
        );
        self.providers.push(provider);
        Ok(())
    }

    /// Remove a provider by vocabulary id or scheme URI, returning it.
    pub fn remove_provider(&mut self, id_or_uri: &str) -> Option<ProviderRef> {
        let index = self
            .providers
            .iter()
            .position(|p| provider_answers_to(p.as_ref(), id_or_uri))?;
        Some(self.providers.remove(index))
    }

    /// Look up a provider by vocabulary id or scheme URI.
    pub fn get_provider(&self, id_or_uri: &str) -> Option<ProviderRef> {
        self.providers
            .iter()
            .find(|p| provider_answers_to(p.as_ref(), id_or_uri))
            .cloned()
    }

    /// Providers selected by `filter`, in registration order.
    ///
    /// `ids` entries may be vocabulary ids or scheme URIs; `subject` must be
    /// one of the provider's subject tags.
    pub fn get_providers(&self, filter: &ProviderFilter) -> Vec<ProviderRef> {
        self.providers
            .iter()
            .filter(|p| match &filter.ids {
                Some(ids) => ids.iter().any(|id| provider_answers_to(p.as_ref(), id)),
                None => true,
            })
            .filter(|p| match &filter.subject {
                Some(subject) => p.metadata().subject.iter().any(|s| s == subject),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Run `query` against every selected provider.
    ///
    /// Without an explicit language each provider labels its results in its
    /// own default language.
    pub fn find(
        &self,
        query: &Query,
        filter: &ProviderFilter,
        language: Option<&str>,
    ) -> Result<Vec<ProviderResults>> {
        let providers = self.get_providers(filter);
        let mut groups = Vec::with_capacity(providers.len());
        for provider in providers {
            let language = language
                .or_else(|| provider.default_language())
                .unwrap_or(defaults::LANGUAGE);
            let results = provider.find(query, language)?;
            groups.push(ProviderResults { provider, results });
        }
        debug!(
            subsystem = "registry",
            component = "registry",
            op = "find",
            provider_count = groups.len(),
            result_count = groups.iter().map(|g| g.results.len()).sum::<usize>(),
            "Registry find completed"
        );
        Ok(groups)
    }

    /// Resolve a concept or collection URI to the entry and its provider.
    pub fn get_by_uri(&self, uri: &str) -> Option<(ProviderRef, Thing)> {
        self.providers
            .iter()
            .find_map(|p| p.get_by_uri(uri).map(|thing| (Arc::clone(p), thing)))
    }

    /// Resolve a concept scheme URI to its provider.
    pub fn get_scheme_by_uri(&self, uri: &str) -> Option<ProviderRef> {
        self.providers
            .iter()
            .find(|p| p.concept_scheme().uri == uri)
            .cloned()
    }
}
