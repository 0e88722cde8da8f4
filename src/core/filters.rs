use crate::core::distance::{bounding_box, distance_to_place, is_within_bounding_box};
use crate::models::{ActiveFilters, BoundingBox, Category, GeoPoint, Place, PriceRange};

/// Apply a filter set to a sequence of places
///
/// Predicates are evaluated cheapest first: tri-state and enum checks,
/// then tag membership, then the bounding box and Haversine distance, and
/// finally the text search which has to fold every searchable field.
/// The result set does not depend on this order.
///
/// The distance predicate only applies when `user_location` is supplied;
/// without a coordinate no place is excluded on distance grounds.
pub fn apply_filters<'a, I>(
    places: I,
    filters: &ActiveFilters,
    user_location: Option<GeoPoint>,
) -> Vec<&'a Place>
where
    I: IntoIterator<Item = &'a Place>,
{
    let query = normalize_query(&filters.query);
    let distance = match (filters.max_distance, user_location) {
        (Some(max_km), Some(user)) => Some(DistanceConstraint::new(user, max_km)),
        _ => None,
    };

    let filtered: Vec<&Place> = places
        .into_iter()
        .filter(|place| !filters.open_now || place.is_open_now())
        .filter(|place| matches_categories(place, &filters.categories))
        .filter(|place| matches_min_rating(place, filters.min_rating))
        .filter(|place| matches_price_range(place, &filters.price_range))
        .filter(|place| matches_tags(place, &filters.tags))
        .filter(|place| distance.as_ref().map_or(true, |d| d.allows(place)))
        .filter(|place| query.as_deref().map_or(true, |q| matches_query(place, q)))
        .collect();

    tracing::trace!("Filters kept {} places", filtered.len());

    filtered
}

/// Trim and case-fold a search query; `None` when nothing is left
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Text search over name, description, address, category and tags
///
/// `normalized_query` must already be trimmed and lowercase.
pub fn matches_query(place: &Place, normalized_query: &str) -> bool {
    let mut haystack = String::with_capacity(
        place.name.len() + place.description.len() + place.address.len() + 64,
    );
    haystack.push_str(&place.name);
    haystack.push(' ');
    haystack.push_str(&place.description);
    haystack.push(' ');
    haystack.push_str(&place.address);
    haystack.push(' ');
    haystack.push_str(place.category.as_str());
    for tag in &place.tags {
        haystack.push(' ');
        haystack.push_str(tag);
    }

    haystack.to_lowercase().contains(normalized_query)
}

/// At least one selected tag (OR semantics); empty selection matches all
#[inline]
pub fn matches_tags(place: &Place, tags: &[String]) -> bool {
    tags.is_empty() || tags.iter().any(|tag| place.has_tag(tag))
}

#[inline]
pub fn matches_categories(place: &Place, categories: &[Category]) -> bool {
    categories.is_empty() || categories.contains(&place.category)
}

/// A minimum rating of zero (or below) is no constraint
#[inline]
pub fn matches_min_rating(place: &Place, min_rating: f64) -> bool {
    min_rating <= 0.0 || place.rating >= min_rating
}

/// Places without a price range never match an active price filter
#[inline]
pub fn matches_price_range(place: &Place, price_ranges: &[PriceRange]) -> bool {
    if price_ranges.is_empty() {
        return true;
    }
    place
        .price_range
        .map_or(false, |price| price_ranges.contains(&price))
}

/// Distance predicate with a precomputed bounding box
struct DistanceConstraint {
    user: GeoPoint,
    max_km: f64,
    bbox: Option<BoundingBox>,
}

impl DistanceConstraint {
    fn new(user: GeoPoint, max_km: f64) -> Self {
        Self {
            user,
            max_km,
            bbox: bounding_box(user, max_km),
        }
    }

    fn allows(&self, place: &Place) -> bool {
        if let Some(bbox) = &self.bbox {
            if !is_within_bounding_box(&place.location, bbox) {
                return false;
            }
        }
        distance_to_place(self.user, place) <= self.max_km
    }
}
