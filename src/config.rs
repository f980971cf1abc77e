use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub domain_base_url: String,
    pub search_region: String,
    pub search_state: String,
    pub search_postcode: String,
    pub cache_enabled: bool,
    pub cache_dir: PathBuf,
    pub detail_concurrency: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            domain_base_url: std::env::var("DOMAIN_BASE_URL")
                .unwrap_or_else(|_| "https://rest.domain.com.au".to_string())
                .trim_end_matches('/')
                .to_string(),
            search_region: std::env::var("SEARCH_REGION")
                .unwrap_or_else(|_| "Sydney Region".to_string()),
            search_state: std::env::var("SEARCH_STATE").unwrap_or_else(|_| "NSW".to_string()),
            search_postcode: std::env::var("SEARCH_POSTCODE")
                .unwrap_or_else(|_| "2000".to_string()),
            cache_enabled: std::env::var("CACHE_ENABLED")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            cache_dir: std::env::var("CACHE_DIR")
                .unwrap_or_else(|_| "./cache".to_string())
                .into(),
            detail_concurrency: std::env::var("DETAIL_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DETAIL_CONCURRENCY must be a positive number"))?,
        };

        if config.domain_base_url.trim().is_empty() {
            anyhow::bail!("DOMAIN_BASE_URL cannot be empty");
        }
        if !config.domain_base_url.starts_with("http://")
            && !config.domain_base_url.starts_with("https://")
        {
            anyhow::bail!("DOMAIN_BASE_URL must start with http:// or https://");
        }
        if config.search_region.trim().is_empty() {
            anyhow::bail!("SEARCH_REGION cannot be empty");
        }
        if config.detail_concurrency == 0 {
            anyhow::bail!("DETAIL_CONCURRENCY must be at least 1");
        }

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Domain base URL: {}", config.domain_base_url);
        tracing::debug!(
            "Search criteria: region={}, state={}, postcode={}",
            config.search_region,
            config.search_state,
            config.search_postcode
        );
        if config.cache_enabled {
            tracing::info!("Disk cache enabled at {}", config.cache_dir.display());
        }
        tracing::debug!("Detail fan-out concurrency: {}", config.detail_concurrency);
        tracing::debug!("Server port: {}", config.port);

        Ok(config)
    }
}
