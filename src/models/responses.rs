use serde::{Deserialize, Serialize};
use crate::models::domain::Place;

/// One search result, annotated when a location or ranking was applied
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub place: Place,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub places: Vec<SearchHit>,
    pub total_results: usize,
    /// False when a distance filter was requested without a usable location
    pub distance_filter_applied: bool,
}

/// Place detail with the links the detail screen offers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailResponse {
    pub place: Place,
    pub map_url: String,
    pub share_message: String,
    pub instagram_url: Option<String>,
    pub price_label: Option<String>,
    pub is_favorite: bool,
    pub distance_km: Option<f64>,
}

/// Saved places
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub favorites: Vec<String>,
    /// Saved places still present in the catalog, in save order
    pub places: Vec<Place>,
    pub count: usize,
}

/// Mean time-to-decision split by whether filters were used
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSpeedSummary {
    pub sample_with_filters: usize,
    pub sample_without_filters: usize,
    pub avg_ms_with_filters: Option<f64>,
    pub avg_ms_without_filters: Option<f64>,
}

/// Aggregates over favorite toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesSummary {
    pub total_events: usize,
    pub saves: usize,
    pub unsaves: usize,
    pub unique_places_saved: usize,
    pub last_total_favorites: Option<u64>,
}

/// Response for the analytics summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummaryResponse {
    pub decision_speed: DecisionSpeedSummary,
    pub favorites: FavoritesSummary,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub places: usize,
    pub cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Feed cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
