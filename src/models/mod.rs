// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActiveFilters, AnalyticsEvent, AppSettings, BoundingBox, Category, DistanceUnit, EventName, FavoriteToggle, GeoPoint,
    HomeFeed, LocationEstimate, NearbyPlace, Place, PreferenceSignal, PriceRange, ScoredPlace,
};
pub use requests::{AnalyticsEventRequest, HomeFeedRequest, PlaceDetailQuery, SearchRequest, ToggleFavoriteRequest};
pub use responses::{
    AnalyticsSummaryResponse, CacheStats, DecisionSpeedSummary, FavoritesSummary, ErrorResponse, FavoritesResponse, HealthResponse, PlaceDetailResponse,
    SearchHit, SearchResponse,
};
