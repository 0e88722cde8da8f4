//! WhereToBaku - Local-first place discovery engine
//!
//! This library ranks, filters and composes the place lists shown by the
//! WhereToBaku app. The catalog is read-only and bundled with the app;
//! favorites, preferences, settings and analytics live in a local SQLite
//! store. A small HTTP adapter exposes the engine to the presentation layer.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{apply_filters, distance_km, rank_by_relevance, relevance_score, FeedComposer, BAKU_CENTER};
pub use models::{ActiveFilters, GeoPoint, HomeFeed, LocationEstimate, Place, PreferenceSignal};
pub use services::{Catalog, LocalStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let bbox = crate::core::bounding_box(BAKU_CENTER, 10.0).unwrap();
        assert!(bbox.min_lat < BAKU_CENTER.latitude);
        assert!(ActiveFilters::default().is_default());
    }
}
