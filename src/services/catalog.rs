use crate::models::Place;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate place id: {0}")]
    DuplicateId(String),

    #[error("Place {id} has rating {rating} outside [0, 5]")]
    InvalidRating { id: String, rating: f64 },
}

/// Immutable collection of places, loaded once at startup
///
/// Replacing the catalog means building a new one; nothing here mutates.
#[derive(Debug, Clone)]
pub struct Catalog {
    places: Vec<Place>,
    fingerprint: u64,
}

impl Catalog {
    /// Build a catalog, enforcing its invariants
    ///
    /// Duplicate ids and out-of-range ratings are rejected. Invalid
    /// coordinates are kept; ranking treats them as infinitely far away.
    pub fn new(mut places: Vec<Place>) -> Result<Self, CatalogError> {
        let mut seen_ids = HashSet::with_capacity(places.len());

        for place in &mut places {
            if !seen_ids.insert(place.id.clone()) {
                return Err(CatalogError::DuplicateId(place.id.clone()));
            }

            if !(0.0..=5.0).contains(&place.rating) {
                return Err(CatalogError::InvalidRating {
                    id: place.id.clone(),
                    rating: place.rating,
                });
            }

            if !place.location.is_valid() {
                tracing::warn!(
                    "Place {} has invalid coordinates ({}, {}), it will never match distance filters",
                    place.id,
                    place.location.latitude,
                    place.location.longitude
                );
            }

            dedupe_tags(&mut place.tags);
        }

        let mut hasher = DefaultHasher::new();
        match serde_json::to_vec(&places) {
            Ok(bytes) => bytes.hash(&mut hasher),
            Err(_) => places.iter().for_each(|place| place.id.hash(&mut hasher)),
        }

        Ok(Self {
            places,
            fingerprint: hasher.finish(),
        })
    }

    /// Load the catalog from a JSON array of places
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let places: Vec<Place> = serde_json::from_str(&raw)?;
        let catalog = Self::new(places)?;

        tracing::info!(
            "Loaded {} places from {}",
            catalog.len(),
            path.as_ref().display()
        );

        Ok(catalog)
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|place| place.id == id)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Identity of the catalog contents, changes on any replacement
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

/// Drop repeated tags, keeping the first occurrence
fn dedupe_tags(tags: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(tags.len());
    tags.retain(|tag| seen.insert(tag.clone()));
}
