/// Listing enrichment fan-out.
///
/// Given the summary listings from the search service and optional reference
/// coordinates, produce one enriched record per listing by concurrently
/// fetching the per-AdId detail set, merging Description/Inspections into the
/// whitelisted summary fields, and optionally computing a haversine distance.
///
/// Failure model is deliberately asymmetric: a detail fetch or shape failure
/// aborts the whole batch, while a distance computation failure only marks
/// that one record's Distance field.
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::domain_client::DomainClient;
use crate::errors::AppError;
use crate::geo::haversine_distance_m;
use crate::models::{EnrichedRecord, ListingRecord, STANDARD_FIELDS};

/// Marker stored under `Distance` when the record's coordinates cannot be
/// interpreted as numbers.
pub const DISTANCE_FAILURE_MARKER: &str = "";

/// Enrich all listings, preserving input order in the output.
///
/// Detail fetches run concurrently, at most `concurrency` in flight at once.
/// The first fetch or shape failure fails the whole batch; no partial result
/// is returned on that path.
pub async fn enrich_listings(
    client: &DomainClient,
    listings: Vec<ListingRecord>,
    coords: Option<(f64, f64)>,
    concurrency: usize,
) -> Result<Vec<EnrichedRecord>, AppError> {
    let total = listings.len();
    tracing::info!(
        "Enriching {} listings (concurrency: {}, coords: {:?})",
        total,
        concurrency,
        coords
    );

    let enriched: Vec<EnrichedRecord> = stream::iter(listings)
        .map(|listing| enrich_listing(client, listing, coords))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    tracing::info!("Enriched {} listings", enriched.len());
    Ok(enriched)
}

/// Enrich a single listing: whitelist filter, detail fetch, merge, optional
/// distance.
pub async fn enrich_listing(
    client: &DomainClient,
    listing: ListingRecord,
    coords: Option<(f64, f64)>,
) -> Result<EnrichedRecord, AppError> {
    let ad_id = extract_ad_id(&listing)?;
    let mut record = filter_standard_fields(&listing);

    let detail = client.fetch_detail(&ad_id).await?;
    let first = detail.listings.first().ok_or_else(|| {
        AppError::MalformedResponse(format!("Detail response for AdId {} has no listings", ad_id))
    })?;

    record.insert(
        "Description".to_string(),
        Value::String(first.description.clone()),
    );
    record.insert(
        "Inspections".to_string(),
        Value::String(first.inspections.clone()),
    );

    if let Some(reference) = coords {
        if let Some(distance) = distance_value(&record, reference, &ad_id) {
            record.insert("Distance".to_string(), distance);
        }
    }

    Ok(record)
}

/// Filter a summary record down to the whitelisted standard fields.
/// Unknown fields are dropped; missing fields stay absent.
pub fn filter_standard_fields(listing: &ListingRecord) -> EnrichedRecord {
    listing
        .iter()
        .filter(|(key, _)| STANDARD_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Pull the correlation key out of a summary record. Upstream serializes it
/// as either a JSON string or an integer.
fn extract_ad_id(listing: &ListingRecord) -> Result<String, AppError> {
    match listing.get("AdId") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AppError::MalformedResponse(
            "Summary listing has no usable AdId".to_string(),
        )),
    }
}

/// Interpret a coordinate field. Upstream serializes coordinates as numbers
/// or numeric strings; anything else is unparseable.
pub fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Compute the Distance value for a record, if any.
///
/// Returns `None` (no Distance field at all) when Latitude or Longitude is
/// absent or null. Returns the failure marker when both are present but
/// either fails to parse, or the result is not a representable number; this
/// path logs and never errors.
fn distance_value(record: &EnrichedRecord, reference: (f64, f64), ad_id: &str) -> Option<Value> {
    let lat_field = record.get("Latitude").filter(|v| !v.is_null())?;
    let lon_field = record.get("Longitude").filter(|v| !v.is_null())?;

    let parsed = match (coordinate_value(lat_field), coordinate_value(lon_field)) {
        (Some(lat), Some(lon)) => {
            let distance = haversine_distance_m(lat, lon, reference.0, reference.1);
            serde_json::Number::from_f64(distance).map(Value::Number)
        }
        _ => None,
    };

    match parsed {
        Some(value) => Some(value),
        None => {
            tracing::warn!(
                "Distance computation failed for AdId {} (Latitude: {}, Longitude: {})",
                ad_id,
                lat_field,
                lon_field
            );
            Some(Value::String(DISTANCE_FAILURE_MARKER.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ListingRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn whitelist_drops_unknown_fields() {
        let listing = record(json!({
            "AdId": 123,
            "Headline": "Harbour views",
            "AgencyName": "Not wanted",
            "Price": "$1,000,000"
        }));

        let filtered = filter_standard_fields(&listing);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains_key("AdId"));
        assert!(filtered.contains_key("Headline"));
        assert!(!filtered.contains_key("AgencyName"));
    }

    #[test]
    fn whitelist_does_not_default_missing_fields() {
        let listing = record(json!({ "AdId": "9" }));
        let filtered = filter_standard_fields(&listing);
        assert_eq!(filtered.len(), 1);
        assert!(!filtered.contains_key("Bedrooms"));
    }

    #[test]
    fn ad_id_accepts_string_and_number() {
        assert_eq!(
            extract_ad_id(&record(json!({ "AdId": "2011868349" }))).unwrap(),
            "2011868349"
        );
        assert_eq!(
            extract_ad_id(&record(json!({ "AdId": 2011868349u64 }))).unwrap(),
            "2011868349"
        );
        assert!(extract_ad_id(&record(json!({ "Headline": "no id" }))).is_err());
    }

    #[test]
    fn coordinate_value_parses_numbers_and_numeric_strings() {
        assert_eq!(coordinate_value(&json!(-33.87)), Some(-33.87));
        assert_eq!(coordinate_value(&json!("-33.87")), Some(-33.87));
        assert_eq!(coordinate_value(&json!(" 151.21 ")), Some(151.21));
        assert_eq!(coordinate_value(&json!("not a number")), None);
        assert_eq!(coordinate_value(&json!(null)), None);
        assert_eq!(coordinate_value(&json!([1.0])), None);
    }

    #[test]
    fn distance_omitted_for_null_coordinates() {
        let rec = record(json!({ "Latitude": null, "Longitude": "151.21" }));
        assert_eq!(distance_value(&rec, (0.0, 0.0), "1"), None);

        let rec = record(json!({ "Longitude": "151.21" }));
        assert_eq!(distance_value(&rec, (0.0, 0.0), "1"), None);
    }

    #[test]
    fn distance_marker_for_unparseable_coordinates() {
        let rec = record(json!({ "Latitude": "garbage", "Longitude": "151.21" }));
        assert_eq!(
            distance_value(&rec, (0.0, 0.0), "1"),
            Some(json!(DISTANCE_FAILURE_MARKER))
        );
    }

    #[test]
    fn distance_computed_for_valid_coordinates() {
        let rec = record(json!({ "Latitude": "0", "Longitude": 0.0 }));
        let value = distance_value(&rec, (0.0, 1.0), "1").unwrap();
        let distance = value.as_f64().unwrap();
        assert!((distance - 111_195.0).abs() < 10.0, "got {}", distance);
    }
}
