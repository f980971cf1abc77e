//! Property Match Search API Library
//!
//! This library provides the core functionality for the Property Match Search
//! API: fetching summary listings from the Domain search service, enriching
//! each listing concurrently with description/inspection details and an
//! optional distance to caller-supplied coordinates, and serving the merged
//! records over HTTP.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `domain_client`: Domain REST API client with optional disk cache.
//! - `enrichment`: Concurrent listing enrichment fan-out.
//! - `errors`: Error handling types.
//! - `geo`: Great-circle distance math.
//! - `handlers`: HTTP request handlers.
//! - `models`: Wire and record models.

pub mod config;
pub mod domain_client;
pub mod enrichment;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod models;
