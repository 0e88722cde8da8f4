use super::{storage_failed, validation_failed, AppState};
use crate::models::{
    AnalyticsEventRequest, AnalyticsSummaryResponse, AppSettings, EventName, FavoritesResponse,
    Place, PreferenceSignal, ToggleFavoriteRequest,
};
use crate::services::analytics::{self, summarize_decision_speed, summarize_favorites};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure on-device state routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/preferences", web::get().to(get_preferences))
        .route("/preferences", web::put().to(save_preferences))
        .route("/preferences/reset", web::post().to(reset_preferences))
        .route("/favorites", web::get().to(get_favorites))
        .route("/favorites", web::delete().to(clear_favorites))
        .route("/favorites/toggle", web::post().to(toggle_favorite))
        .route("/settings", web::get().to(get_settings))
        .route("/settings", web::put().to(save_settings))
        .route("/analytics/events", web::post().to(record_event))
        .route("/analytics/summary", web::get().to(analytics_summary));
}

async fn get_preferences(state: web::Data<AppState>) -> impl Responder {
    match state.store.preferences().await {
        Ok(preferences) => HttpResponse::Ok().json(preferences),
        Err(e) => storage_failed("Failed to read preferences", e),
    }
}

/// Replace the onboarding preferences
async fn save_preferences(
    state: web::Data<AppState>,
    req: web::Json<PreferenceSignal>,
) -> impl Responder {
    let preferences = req.into_inner();

    match state.store.save_preferences(&preferences).await {
        Ok(()) => {
            tracing::info!(
                "Saved preferences: {} tags, {} categories, {} price ranges",
                preferences.tags.len(),
                preferences.categories.len(),
                preferences.price_ranges.len()
            );
            HttpResponse::Ok().json(preferences)
        }
        Err(e) => storage_failed("Failed to save preferences", e),
    }
}

async fn reset_preferences(state: web::Data<AppState>) -> impl Responder {
    let mut preferences = match state.store.preferences().await {
        Ok(preferences) => preferences,
        Err(e) => return storage_failed("Failed to read preferences", e),
    };
    preferences.reset();

    match state.store.save_preferences(&preferences).await {
        Ok(()) => HttpResponse::Ok().json(preferences),
        Err(e) => storage_failed("Failed to reset preferences", e),
    }
}

/// Saved place ids plus the places still present in the catalog
async fn get_favorites(state: web::Data<AppState>) -> impl Responder {
    let favorites = match state.store.favorites().await {
        Ok(favorites) => favorites,
        Err(e) => return storage_failed("Failed to read favorites", e),
    };

    let places: Vec<Place> = favorites
        .iter()
        .filter_map(|id| state.catalog.find_by_id(id))
        .cloned()
        .collect();

    HttpResponse::Ok().json(FavoritesResponse {
        count: favorites.len(),
        favorites,
        places,
    })
}

/// Toggle endpoint
///
/// POST /api/v1/favorites/toggle
///
/// Request body:
/// ```json
/// { "placeId": "maiden-tower" }
/// ```
async fn toggle_favorite(
    state: web::Data<AppState>,
    req: web::Json<ToggleFavoriteRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let toggle = match state.store.toggle_favorite(&req.place_id).await {
        Ok(toggle) => toggle,
        Err(e) => return storage_failed("Failed to toggle favorite", e),
    };

    let data = serde_json::json!({
        "placeId": toggle.place_id,
        "saved": toggle.saved,
        "totalFavorites": toggle.total_favorites,
    });
    analytics::track(&state.store, EventName::FavoriteToggled, Some(data)).await;

    HttpResponse::Ok().json(toggle)
}

async fn clear_favorites(state: web::Data<AppState>) -> impl Responder {
    match state.store.clear_favorites().await {
        Ok(cleared) => HttpResponse::Ok().json(serde_json::json!({ "cleared": cleared })),
        Err(e) => storage_failed("Failed to clear favorites", e),
    }
}

async fn get_settings(state: web::Data<AppState>) -> impl Responder {
    match state.store.settings().await {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => storage_failed("Failed to read settings", e),
    }
}

async fn save_settings(state: web::Data<AppState>, req: web::Json<AppSettings>) -> impl Responder {
    let settings = req.into_inner();

    match state.store.save_settings(&settings).await {
        Ok(()) => {
            tracing::info!("Saved settings: location_enabled={}", settings.location_enabled);
            HttpResponse::Ok().json(settings)
        }
        Err(e) => storage_failed("Failed to save settings", e),
    }
}

/// Record a client-side event such as `place_opened`
///
/// Events are best effort; storage failures are logged and the request
/// still succeeds.
async fn record_event(
    state: web::Data<AppState>,
    req: web::Json<AnalyticsEventRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    match analytics::log_event(&state.store, req.event, req.data).await {
        Ok(event) => HttpResponse::Accepted().json(event),
        Err(e) => {
            tracing::warn!("Dropping {} event: {}", req.event.as_str(), e);
            HttpResponse::Accepted().finish()
        }
    }
}

async fn analytics_summary(state: web::Data<AppState>) -> impl Responder {
    let events = match state.store.events().await {
        Ok(events) => events,
        Err(e) => return storage_failed("Failed to read analytics", e),
    };

    HttpResponse::Ok().json(AnalyticsSummaryResponse {
        decision_speed: summarize_decision_speed(&events),
        favorites: summarize_favorites(&events),
    })
}
