//! skosweb-api server binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skosweb_api::{build_app, ApiConfig, AppState, RegistryFactory};
use skosweb_registry::Registry;

/// Set up logging.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to a log file, rotated daily (optional)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - env filter (default: "skosweb_api=debug,tower_http=debug")
///
/// The returned guard flushes the file writer and must outlive the server.
fn init_tracing() -> Option<WorkerGuard> {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json");
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "skosweb_api=debug,skosweb_registry=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let Some(path) = log_file.as_deref().map(Path::new) else {
        if json {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        return None;
    };

    let dir = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("skosweb-api.log");
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        // No ANSI in files unless asked for.
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(log_ansi.unwrap_or(false));
        registry.with(layer).init();
    }
    Some(guard)
}

/// Registry built from the dataset directory, or an empty one.
fn registry_factory(data_dir: Option<PathBuf>) -> RegistryFactory {
    Arc::new(move || match &data_dir {
        Some(dir) => Registry::from_dir(dir),
        None => Ok(Registry::new()),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = ApiConfig::from_env().context("Invalid configuration")?;
    info!(
        subsystem = "api",
        op = "startup",
        data_dir = ?config.data_dir,
        registry_scope = %config.registry_scope,
        context_mode = %config.context_mode,
        default_language = %config.default_language,
        "Configuration loaded"
    );

    let registry_provider = config
        .registry_scope
        .provider(registry_factory(config.data_dir.clone()))
        .context("Failed to load vocabularies")?;
    // A request-scoped registry is built once here as well so broken
    // datasets fail at start-up.
    let registry = registry_provider
        .registry()
        .context("Failed to load vocabularies")?;
    info!(
        subsystem = "api",
        op = "startup",
        provider_count = registry.len(),
        "Vocabulary registry ready"
    );

    let state = AppState::new(&config, registry_provider)?;
    let app = build_app(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
