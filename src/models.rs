use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary fields carried through to the enriched output. Anything else on
/// the summary record is dropped; absent fields stay absent (no defaulting).
pub const STANDARD_FIELDS: [&str; 9] = [
    "AdId",
    "Bathrooms",
    "Bedrooms",
    "Carspaces",
    "Headline",
    "DateUpdated",
    "Latitude",
    "Longitude",
    "Region",
];

/// Raw summary listing as returned by the search service. Kept as a loose
/// JSON mapping so unknown upstream fields pass through the whitelist filter
/// untyped.
pub type ListingRecord = Map<String, Value>;

/// Final merged record returned to API callers.
pub type EnrichedRecord = Map<String, Value>;

/// Top-level shape of the Domain search service response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "ListingResults")]
    pub listing_results: ListingResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingResults {
    #[serde(rename = "Listings")]
    pub listings: Vec<ListingRecord>,
}

/// Property detail service response for a single AdId.
///
/// Description and Inspections are required: a detail payload missing either
/// is a malformed response and aborts the whole enrichment batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    #[serde(rename = "Listings")]
    pub listings: Vec<DetailListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailListing {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Inspections")]
    pub inspections: String,
}

/// Query parameters accepted by GET /PropertyMatchSearch.
///
/// Both values are numeric strings; distance is only computed when both are
/// present and parse as floats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl SearchParams {
    /// Resolve the optional reference coordinates. Returns `None` unless both
    /// parameters are present and parseable, in which case distance is simply
    /// omitted from the response rather than rejected.
    pub fn coords(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_deref()?.trim().parse::<f64>().ok()?;
        let lon = self.longitude.as_deref()?.trim().parse::<f64>().ok()?;
        Some((lat, lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_require_both_params() {
        let params = SearchParams {
            latitude: Some("-33.87".to_string()),
            longitude: None,
        };
        assert_eq!(params.coords(), None);

        let params = SearchParams {
            latitude: None,
            longitude: Some("151.21".to_string()),
        };
        assert_eq!(params.coords(), None);
    }

    #[test]
    fn coords_parse_numeric_strings() {
        let params = SearchParams {
            latitude: Some("-33.87".to_string()),
            longitude: Some(" 151.21 ".to_string()),
        };
        assert_eq!(params.coords(), Some((-33.87, 151.21)));
    }

    #[test]
    fn coords_unparseable_yields_none() {
        let params = SearchParams {
            latitude: Some("south".to_string()),
            longitude: Some("151.21".to_string()),
        };
        assert_eq!(params.coords(), None);
    }

    #[test]
    fn detail_response_requires_description_and_inspections() {
        let missing = serde_json::json!({
            "Listings": [{ "Description": "A nice flat" }]
        });
        assert!(serde_json::from_value::<DetailResponse>(missing).is_err());

        let complete = serde_json::json!({
            "Listings": [{ "Description": "A nice flat", "Inspections": "Sat 10am" }]
        });
        let parsed = serde_json::from_value::<DetailResponse>(complete).unwrap();
        assert_eq!(parsed.listings[0].inspections, "Sat 10am");
    }
}
