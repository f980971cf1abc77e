use std::path::PathBuf;

use reqwest::Client;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{DetailResponse, ListingRecord, SearchResponse};

/// Client for the Domain REST API (search service + property detail service).
///
/// The optional disk cache stores raw JSON responses under the configured
/// directory (`search.json`, `detail_{ad_id}.json`) and serves them on
/// subsequent calls. Cache reads fall through to the network on any failure;
/// cache writes are logged and never fatal.
pub struct DomainClient {
    client: Client,
    base_url: String,
    cache_dir: Option<PathBuf>,
}

impl DomainClient {
    /// Create a client for `base_url`. Passing `Some(dir)` enables the disk
    /// cache rooted at that directory, creating it if needed.
    pub fn new(base_url: String, cache_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        if let Some(ref dir) = cache_dir {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("Failed to create cache dir {:?}: {}", dir, e))?;
        }

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_dir,
        })
    }

    /// Fetch the summary listings for a fixed region/state/postcode query.
    pub async fn search_listings(
        &self,
        region: &str,
        state: &str,
        postcode: &str,
    ) -> Result<Vec<ListingRecord>, AppError> {
        let raw = match self.cache_read("search.json").await {
            Some(cached) => cached,
            None => {
                let raw = self.fetch_search(region, state, postcode).await?;
                self.cache_write("search.json", &raw).await;
                raw
            }
        };

        let response: SearchResponse = serde_json::from_value(raw).map_err(|e| {
            AppError::MalformedResponse(format!("Unexpected search response shape: {}", e))
        })?;

        let listings = response.listing_results.listings;
        tracing::info!("Search returned {} listings", listings.len());
        Ok(listings)
    }

    /// Fetch the extended detail set for a given AdId.
    pub async fn fetch_detail(&self, ad_id: &str) -> Result<DetailResponse, AppError> {
        let cache_file = format!("detail_{}.json", ad_id);

        let raw = match self.cache_read(&cache_file).await {
            Some(cached) => cached,
            None => {
                let raw = self.fetch_detail_raw(ad_id).await?;
                self.cache_write(&cache_file, &raw).await;
                raw
            }
        };

        serde_json::from_value(raw).map_err(|e| {
            AppError::MalformedResponse(format!(
                "Unexpected detail response shape for AdId {}: {}",
                ad_id, e
            ))
        })
    }

    async fn fetch_search(
        &self,
        region: &str,
        state: &str,
        postcode: &str,
    ) -> Result<Value, AppError> {
        // Build URL with proper parameter encoding
        let url = reqwest::Url::parse_with_params(
            &format!("{}/searchservice.svc/search", self.base_url),
            &[("regions", region), ("state", state), ("pcodes", postcode)],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build search URL: {}", e)))?;

        tracing::info!(
            "Fetching listings: region={}, state={}, postcode={}",
            region,
            state,
            postcode
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Search service request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Search service returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Search service returned status {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse search response: {}", e))
        })
    }

    async fn fetch_detail_raw(&self, ad_id: &str) -> Result<Value, AppError> {
        let url = format!(
            "{}/propertydetailsservice.svc/propertydetail/{}",
            self.base_url, ad_id
        );

        tracing::debug!("Fetching detail for AdId: {}", ad_id);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Detail request failed for AdId {}: {}", ad_id, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                "Detail service returned error {} for AdId {}: {}",
                status,
                ad_id,
                error_text
            );
            return Err(AppError::ExternalApiError(format!(
                "Detail service returned status {} for AdId {}: {}",
                status, ad_id, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!(
                "Failed to parse detail response for AdId {}: {}",
                ad_id, e
            ))
        })
    }

    async fn cache_read(&self, file_name: &str) -> Option<Value> {
        let path = self.cache_path(file_name)?;
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => {
                tracing::debug!("Cache hit: {}", path.display());
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn cache_write(&self, file_name: &str, value: &Value) {
        let Some(path) = self.cache_path(file_name) else {
            return;
        };
        let content = match serde_json::to_string(value) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry {}: {}", file_name, e);
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&path, content).await {
            tracing::warn!("Failed to write cache file {}: {}", path.display(), e);
        }
    }

    fn cache_path(&self, file_name: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(file_name))
    }
}
