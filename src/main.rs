use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_match_api::config::Config;
use property_match_api::domain_client::DomainClient;
use property_match_api::handlers::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_match_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize Domain API client, with the disk cache when enabled
    let cache_dir = config.cache_enabled.then(|| config.cache_dir.clone());
    let domain_client = DomainClient::new(config.domain_base_url.clone(), cache_dir)?;
    tracing::info!("Domain client initialized: {}", config.domain_base_url);

    let port = config.port;
    let app_state = Arc::new(AppState {
        config,
        domain_client: Arc::new(domain_client),
    });

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/PropertyMatchSearch",
            get(handlers::property_match_search),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
