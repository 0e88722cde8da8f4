use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::links::Platform;
use crate::models::domain::{ActiveFilters, EventName, LocationEstimate};

/// Request to search the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    #[validate(nested)]
    pub filters: ActiveFilters,
    #[serde(default)]
    #[validate(nested)]
    pub location: Option<LocationEstimate>,
    /// Rank results by relevance instead of catalog order
    #[serde(default)]
    pub sort_by_relevance: bool,
}

/// Request to compose the home feed
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeedRequest {
    #[serde(default)]
    #[validate(nested)]
    pub location: Option<LocationEstimate>,
}

/// Query string for the place detail endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlaceDetailQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[serde(default)]
    pub platform: Platform,
}

/// Request to save or unsave a place
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleFavoriteRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "place_id", rename = "placeId")]
    pub place_id: String,
}

/// Request to record an analytics event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyticsEventRequest {
    #[serde(alias = "name")]
    pub event: EventName,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}
