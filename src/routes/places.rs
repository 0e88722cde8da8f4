use super::{place_not_found, validation_failed, AppState};
use crate::core::distance::distance_to_place;
use crate::core::links::{instagram_url, map_url, share_message};
use crate::core::{apply_filters, rank_by_relevance};
use crate::models::{
    EventName, GeoPoint, HealthResponse, HomeFeedRequest, LocationEstimate, Place,
    PlaceDetailQuery, PlaceDetailResponse, SearchHit, SearchRequest, SearchResponse,
};
use crate::services::{analytics, FeedKey};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure catalog, search and feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/places", web::get().to(list_places))
        .route("/places/search", web::post().to(search_places))
        .route("/places/{id}", web::get().to(get_place))
        .route("/feed/home", web::post().to(home_feed));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        places: state.catalog.len(),
        cache: state.cache.stats().await,
        timestamp: chrono::Utc::now(),
    })
}

/// All places in catalog order
async fn list_places(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.places())
}

/// Place detail endpoint
///
/// GET /api/v1/places/{id}?lat=40.4&lng=49.8&platform=ios
async fn get_place(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PlaceDetailQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let id = path.into_inner();
    let Some(place) = state.catalog.find_by_id(&id) else {
        tracing::debug!("Unknown place requested: {}", id);
        return place_not_found(&id);
    };

    let is_favorite = state.store.is_favorite(&id).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to read favorites for {}: {}", id, e);
        false
    });

    let distance_km = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => finite(distance_to_place(GeoPoint::new(lat, lng), place)),
        _ => None,
    };

    HttpResponse::Ok().json(PlaceDetailResponse {
        map_url: map_url(place, query.platform),
        share_message: share_message(place, query.platform),
        instagram_url: place.instagram.as_deref().and_then(instagram_url),
        price_label: place.price_range.map(|price| price.label().to_string()),
        is_favorite,
        distance_km,
        place: place.clone(),
    })
}

/// Search endpoint
///
/// POST /api/v1/places/search
///
/// Request body:
/// ```json
/// {
///   "filters": { "query": "tea", "tags": ["cozy"], "minRating": 4, "maxDistance": 3 },
///   "location": { "lat": 40.4093, "lng": 49.8671 },
///   "sortByRelevance": true
/// }
/// ```
async fn search_places(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let settings = state.store.settings().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to read settings, using defaults: {}", e);
        Default::default()
    });

    let user = if settings.location_enabled {
        req.location.as_ref().and_then(LocationEstimate::for_filtering)
    } else {
        None
    };

    let filtered = apply_filters(state.catalog.places(), &req.filters, user);

    let places: Vec<SearchHit> = if req.sort_by_relevance {
        let preferences = state.store.preferences().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read preferences, ranking without them: {}", e);
            Default::default()
        });
        let origin = user.unwrap_or(state.fallback_location);

        rank_by_relevance(
            filtered,
            origin.latitude,
            origin.longitude,
            &preferences.tags,
            req.filters.min_rating,
        )
        .into_iter()
        .map(|(place, score)| search_hit(place, user, Some(score)))
        .collect()
    } else {
        filtered
            .into_iter()
            .map(|place| search_hit(place, user, None))
            .collect()
    };

    tracing::info!(
        "Search returned {} places (relevance: {})",
        places.len(),
        req.sort_by_relevance
    );

    if !req.filters.is_default() {
        let data = serde_json::json!({
            "filters": req.filters,
            "resultCount": places.len(),
        });
        analytics::track(&state.store, EventName::FiltersUsed, Some(data)).await;
    }

    HttpResponse::Ok().json(SearchResponse {
        total_results: places.len(),
        distance_filter_applied: req.filters.max_distance.is_some() && user.is_some(),
        places,
    })
}

/// Home feed endpoint
///
/// POST /api/v1/feed/home
async fn home_feed(state: web::Data<AppState>, req: web::Json<HomeFeedRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let settings = state.store.settings().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to read settings, using defaults: {}", e);
        Default::default()
    });
    let preferences = state.store.preferences().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to read preferences, composing without them: {}", e);
        Default::default()
    });

    let user = match (&req.location, settings.location_enabled) {
        (Some(location), true) => location.resolved(state.fallback_location),
        _ => state.fallback_location,
    };

    let key = FeedKey::home(
        state.catalog.fingerprint(),
        user,
        &preferences,
        state.composer.section_limit(),
    );

    let feed = state
        .cache
        .get_or_compose(key, async {
            state.composer.compose(state.catalog.places(), user, &preferences)
        })
        .await;

    HttpResponse::Ok().json(feed.as_ref())
}

fn search_hit(place: &Place, user: Option<GeoPoint>, score: Option<f64>) -> SearchHit {
    SearchHit {
        place: place.clone(),
        distance_km: user.and_then(|user| finite(distance_to_place(user, place))),
        score,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
