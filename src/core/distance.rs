use crate::models::{BoundingBox, GeoPoint, Place};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Baku city center, used whenever the device location is unavailable
pub const BAKU_CENTER: GeoPoint = GeoPoint::new(40.4093, 49.8671);

/// Default search radius in kilometers
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

/// Radius inflation applied to bounding boxes so the pre-filter stays a superset
const BOX_SLACK: f64 = 1.1;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Non-negative distance in kilometers, 0 for identical points
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from the user to a place
///
/// A place with an invalid coordinate is infinitely far away: it never
/// passes a bounded distance filter and never earns a proximity bonus.
#[inline]
pub fn distance_to_place(user: GeoPoint, place: &Place) -> f64 {
    if !place.location.is_valid() {
        return f64::INFINITY;
    }
    user.distance_to(&place.location)
}

/// Calculate a bounding box around a center point
///
/// This is much faster than Haversine for pre-filtering.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// Returns `None` when the box would reach a pole or cross the
/// antimeridian; callers then rely on the exact distance alone.
pub fn bounding_box(center: GeoPoint, radius_km: f64) -> Option<BoundingBox> {
    if !center.is_valid() || !radius_km.is_finite() || radius_km < 0.0 {
        return None;
    }

    let padded = radius_km * BOX_SLACK;
    let lat_delta = padded / 111.0;

    let min_lat = center.latitude - lat_delta;
    let max_lat = center.latitude + lat_delta;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    // Use the latitude closest to a pole inside the box, where degrees shrink most
    let widest_lat = min_lat.abs().max(max_lat.abs());
    let lon_delta = padded / (111.0 * widest_lat.to_radians().cos());

    let min_lon = center.longitude - lon_delta;
    let max_lon = center.longitude + lon_delta;
    if min_lon < -180.0 || max_lon > 180.0 {
        return None;
    }

    Some(BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    })
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: &GeoPoint, bbox: &BoundingBox) -> bool {
    point.latitude >= bbox.min_lat
        && point.latitude <= bbox.max_lat
        && point.longitude >= bbox.min_lon
        && point.longitude <= bbox.max_lon
}
