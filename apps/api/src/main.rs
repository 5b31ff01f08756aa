mod config;
mod errors;
mod layout;
mod models;
mod render;
mod routes;
mod sample;
mod state;
mod templates;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::selection::{InMemorySelectionStore, RedisSelectionStore, SelectionStore};
use crate::templates::TemplateRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Forge API v{}", env!("CARGO_PKG_VERSION"));

    // Template catalogue: built-ins plus an optional operator-supplied file
    let registry = load_registry(&config)?;
    info!("Template catalogue loaded ({} templates)", registry.len());

    // Selection store: Redis when configured, otherwise in-process
    let selections: Arc<dyn SelectionStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!(
                "Redis selection store initialized (ttl {}s)",
                config.session_ttl_secs
            );
            Arc::new(RedisSelectionStore::new(client, config.session_ttl_secs))
        }
        None => {
            info!(
                "REDIS_URL not set; using in-memory selection store (ttl {}s)",
                config.session_ttl_secs
            );
            Arc::new(InMemorySelectionStore::new(Duration::from_secs(
                config.session_ttl_secs,
            )))
        }
    };

    let state = AppState::new(registry, selections);

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            // TODO: restrict origins to the editor host once it has a fixed domain
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_registry(config: &Config) -> Result<TemplateRegistry> {
    let registry = match &config.template_catalogue_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template catalogue '{path}'"))?;
            TemplateRegistry::with_extra_json(&json)?
        }
        None => TemplateRegistry::builtin()?,
    };
    Ok(registry)
}
