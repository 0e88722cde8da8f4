// Route exports
pub mod places;
pub mod profile;

use crate::core::FeedComposer;
use crate::models::{ErrorResponse, GeoPoint};
use crate::services::{Catalog, FeedCache, LocalStore, StoreError};
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<LocalStore>,
    pub cache: Arc<FeedCache>,
    pub composer: FeedComposer,
    /// Ranking coordinate while the device location is unknown
    pub fallback_location: GeoPoint,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(places::configure)
            .configure(profile::configure),
    );
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn storage_failed(context: &str, e: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

fn place_not_found(id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Place not found".to_string(),
        message: format!("No place with id {}", id),
        status_code: 404,
    })
}
