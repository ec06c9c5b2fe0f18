//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `6543` |
//! | `SKOS_DATA_DIR` | unset (empty registry) |
//! | `SKOS_REGISTRY_SCOPE` | `global` |
//! | `SKOS_DEFAULT_LANGUAGE` | `en` |
//! | `SKOS_JSONLD_CONTEXT` | `url` |
//! | `PUBLIC_URL` | `http://{HOST}:{PORT}` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |

use std::path::PathBuf;

use skosweb_core::{defaults, Error, Result};

use crate::negotiation::ContextMode;
use crate::registry_scope::RegistryScope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub registry_scope: RegistryScope,
    pub default_language: String,
    pub context_mode: ContextMode,
    pub public_url: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            data_dir: None,
            registry_scope: RegistryScope::default(),
            default_language: defaults::LANGUAGE.to_string(),
            context_mode: ContextMode::default(),
            public_url: format!("http://{}:{}", defaults::SERVER_HOST, defaults::SERVER_PORT),
            allowed_origins: vec![defaults::ALLOWED_ORIGINS.to_string()],
        }
    }
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got '{}'", raw)))?,
            None => defaults::SERVER_PORT,
        };
        let registry_scope = match get("SKOS_REGISTRY_SCOPE") {
            Some(raw) => raw.parse()?,
            None => RegistryScope::default(),
        };
        let context_mode = match get("SKOS_JSONLD_CONTEXT") {
            Some(raw) => raw.parse()?,
            None => ContextMode::default(),
        };
        let public_url = get("PUBLIC_URL").unwrap_or_else(|| format!("http://{}:{}", host, port));

        Ok(Self {
            data_dir: get("SKOS_DATA_DIR").map(PathBuf::from),
            default_language: get("SKOS_DEFAULT_LANGUAGE")
                .unwrap_or_else(|| defaults::LANGUAGE.to_string()),
            allowed_origins: parse_allowed_origins(
                &get("ALLOWED_ORIGINS").unwrap_or_else(|| defaults::ALLOWED_ORIGINS.to_string()),
            ),
            host,
            port,
            registry_scope,
            context_mode,
            public_url,
        })
    }
}

/// Split a comma-separated origin whitelist.
pub fn parse_allowed_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
