use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;
use crate::domain_client::DomainClient;
use crate::enrichment::enrich_listings;
use crate::errors::AppError;
use crate::models::{EnrichedRecord, SearchParams};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Domain search and detail services.
    pub domain_client: Arc<DomainClient>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "property-match-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /PropertyMatchSearch
///
/// Fetches the summary listings for the configured region/state/postcode,
/// enriches each one with its detail set, and returns the merged records as a
/// JSON array. When both `latitude` and `longitude` query parameters are
/// present and parseable, each record additionally carries a haversine
/// distance in meters to that point.
pub async fn property_match_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<EnrichedRecord>>, AppError> {
    tracing::info!("GET /PropertyMatchSearch - params: {:?}", params);

    let coords = params.coords();

    let listings = state
        .domain_client
        .search_listings(
            &state.config.search_region,
            &state.config.search_state,
            &state.config.search_postcode,
        )
        .await?;

    let enriched = enrich_listings(
        &state.domain_client,
        listings,
        coords,
        state.config.detail_concurrency,
    )
    .await?;

    tracing::info!(
        "Successfully enriched {} listings (distance: {})",
        enriched.len(),
        coords.is_some()
    );

    Ok(Json(enriched))
}
