//! Where handlers get their registry from.
//!
//! The scope is fixed when the application starts: either one registry is
//! shared by every request, or a factory builds a fresh registry for each
//! request. Handlers see neither; they take a [`SkosRegistry`] extractor.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use skosweb_core::{Error, Result};
use skosweb_registry::Registry;

use crate::error::ApiError;
use crate::AppState;

/// Supplies the registry for a request.
pub trait RegistryProvider: Send + Sync {
    fn registry(&self) -> Result<Arc<Registry>>;
}

/// One registry, built at start-up and shared read-only.
pub struct GlobalRegistryProvider {
    registry: Arc<Registry>,
}

impl GlobalRegistryProvider {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

impl RegistryProvider for GlobalRegistryProvider {
    fn registry(&self) -> Result<Arc<Registry>> {
        Ok(Arc::clone(&self.registry))
    }
}

/// Builds a registry.
pub type RegistryFactory = Arc<dyn Fn() -> Result<Registry> + Send + Sync>;

/// A fresh registry for every request.
pub struct PerRequestRegistryProvider {
    factory: RegistryFactory,
}

impl PerRequestRegistryProvider {
    pub fn new(factory: RegistryFactory) -> Self {
        Self { factory }
    }
}

impl RegistryProvider for PerRequestRegistryProvider {
    fn registry(&self) -> Result<Arc<Registry>> {
        let registry = (self.factory)()?;
        debug!(
            subsystem = "api",
            component = "registry_scope",
            op = "build",
            provider_count = registry.len(),
            "Built request-scoped registry"
        );
        Ok(Arc::new(registry))
    }
}

/// Registry location strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryScope {
    #[default]
    Global,
    Request,
}

impl RegistryScope {
    /// Wrap `factory` in the provider for this scope. A global scope calls
    /// the factory once, immediately.
    pub fn provider(&self, factory: RegistryFactory) -> Result<Arc<dyn RegistryProvider>> {
        Ok(match self {
            Self::Global => Arc::new(GlobalRegistryProvider::new(factory()?)),
            Self::Request => Arc::new(PerRequestRegistryProvider::new(factory)),
        })
    }
}

impl fmt::Display for RegistryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Request => write!(f, "request"),
        }
    }
}

impl FromStr for RegistryScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "request" => Ok(Self::Request),
            other => Err(Error::Config(format!(
                "SKOS_REGISTRY_SCOPE must be 'global' or 'request', got '{}'",
                other
            ))),
        }
    }
}

/// The registry for the current request.
pub struct SkosRegistry(pub Arc<Registry>);

#[async_trait]
impl FromRequestParts<AppState> for SkosRegistry {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self(state.registry_provider.registry()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use skosweb_registry::test_fixtures::trees_registry;

    fn counting_factory(calls: Arc<AtomicUsize>) -> RegistryFactory {
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(trees_registry())
        })
    }

    #[test]
    fn test_global_scope_builds_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = RegistryScope::Global
            .provider(counting_factory(Arc::clone(&calls)))
            .unwrap();

        let first = provider.registry().unwrap();
        let second = provider.registry().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_scope_builds_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = RegistryScope::Request
            .provider(counting_factory(Arc::clone(&calls)))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first = provider.registry().unwrap();
        let second = provider.registry().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_errors_propagate() {
        let failing: RegistryFactory =
            Arc::new(|| Err(Error::Dataset("unreadable".to_string())));
        assert!(RegistryScope::Global.provider(Arc::clone(&failing)).is_err());

        let provider = RegistryScope::Request.provider(failing).unwrap();
        assert!(matches!(provider.registry(), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("global".parse::<RegistryScope>().unwrap(), RegistryScope::Global);
        assert_eq!("REQUEST".parse::<RegistryScope>().unwrap(), RegistryScope::Request);
        assert!("session".parse::<RegistryScope>().is_err());
    }
}
