use crate::core::distance::distance_to_place;
use crate::models::{GeoPoint, Place, PreferenceSignal};
use std::cmp::Ordering;

/// Bonus per place tag that appears in the preferred tags
pub const TAG_MATCH_BONUS: f64 = 0.5;
/// Weight on the rating surplus above the minimum rating
pub const RATING_SURPLUS_WEIGHT: f64 = 0.3;
/// Flat penalty for places rated below the minimum
pub const BELOW_MIN_RATING_PENALTY: f64 = 2.0;
/// Bonus for places closer than `NEAR_RADIUS_KM`
pub const NEAR_BONUS: f64 = 0.5;
pub const NEAR_RADIUS_KM: f64 = 2.0;
/// Bonus for places closer than `CLOSE_RADIUS_KM`
pub const CLOSE_BONUS: f64 = 0.2;
pub const CLOSE_RADIUS_KM: f64 = 5.0;

/// Boost for a place in one of the preferred categories
pub const CATEGORY_BOOST: f64 = 0.8;
/// Boost for a place in one of the preferred price ranges
pub const PRICE_MATCH_BOOST: f64 = 1.0;
/// Deduction for a place outside the preferred price ranges
pub const PRICE_MISMATCH_PENALTY: f64 = 0.5;
/// Deduction for a place already surfaced at the top of "near you"
pub const DIVERSITY_PENALTY: f64 = 0.8;

/// Calculate the relevance score for a place (higher is more relevant)
///
/// Scoring formula:
/// score = rating
///     + 0.5 * matching tags
///     + (rating >= min_rating ? 0.3 * (rating - min_rating) : -2)
///     + (distance < 2km ? 0.5 : distance < 5km ? 0.2 : 0)
pub fn relevance_score(
    place: &Place,
    user_lat: f64,
    user_lon: f64,
    preference_tags: &[String],
    min_rating: f64,
) -> f64 {
    let distance = distance_to_place(GeoPoint::new(user_lat, user_lon), place);

    place.rating
        + tag_match_bonus(place, preference_tags)
        + rating_adjustment(place.rating, min_rating)
        + proximity_bonus(distance)
}

/// Sort places by relevance score, descending
///
/// Places with equal scores keep their input order. The input is not
/// modified; scores are computed once per place.
pub fn rank_by_relevance<'a, I>(
    places: I,
    user_lat: f64,
    user_lon: f64,
    preference_tags: &[String],
    min_rating: f64,
) -> Vec<(&'a Place, f64)>
where
    I: IntoIterator<Item = &'a Place>,
{
    let scored = places
        .into_iter()
        .map(|place| {
            let score = relevance_score(place, user_lat, user_lon, preference_tags, min_rating);
            (place, score)
        })
        .collect();

    sort_by_score_desc(scored)
}

/// Score used by the "suggested for you" feed
///
/// Keeps the tag and rating terms of [`relevance_score`] but drops the
/// proximity bonus, then layers preference and diversity terms:
/// score = rating
///     + 0.5 * matching tags
///     + rating adjustment against `min_rating`
///     + 0.8 if the category is preferred
///     + price boost (0 with no preferred prices, else +1 on match / -0.5 otherwise)
///     - 0.8 if the place is among `near_you_top`
pub fn suggestion_score(
    place: &Place,
    preferences: &PreferenceSignal,
    min_rating: f64,
    near_you_top: &[&str],
) -> f64 {
    let category_boost = if preferences.categories.contains(&place.category) {
        CATEGORY_BOOST
    } else {
        0.0
    };

    let price_boost = if preferences.price_ranges.is_empty() {
        0.0
    } else {
        match place.price_range {
            Some(price) if preferences.price_ranges.contains(&price) => PRICE_MATCH_BOOST,
            _ => -PRICE_MISMATCH_PENALTY,
        }
    };

    let diversity_penalty = if near_you_top.contains(&place.id.as_str()) {
        DIVERSITY_PENALTY
    } else {
        0.0
    };

    place.rating
        + tag_match_bonus(place, &preferences.tags)
        + rating_adjustment(place.rating, min_rating)
        + category_boost
        + price_boost
        - diversity_penalty
}

/// Stable descending sort on the score component
pub(crate) fn sort_by_score_desc<T>(mut scored: Vec<(T, f64)>) -> Vec<(T, f64)> {
    // `sort_by` is stable, so ties keep their input order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}

#[inline]
fn tag_match_bonus(place: &Place, preference_tags: &[String]) -> f64 {
    let matching = place
        .tags
        .iter()
        .filter(|tag| preference_tags.contains(*tag))
        .count();
    matching as f64 * TAG_MATCH_BONUS
}

#[inline]
fn rating_adjustment(rating: f64, min_rating: f64) -> f64 {
    if rating >= min_rating {
        (rating - min_rating) * RATING_SURPLUS_WEIGHT
    } else {
        -BELOW_MIN_RATING_PENALTY
    }
}

#[inline]
fn proximity_bonus(distance_km: f64) -> f64 {
    if distance_km < NEAR_RADIUS_KM {
        NEAR_BONUS
    } else if distance_km < CLOSE_RADIUS_KM {
        CLOSE_BONUS
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::BAKU_CENTER;
    use crate::models::{Category, PriceRange};

    fn create_test_place(id: &str, rating: f64, lat: f64, lon: f64, tags: &[&str]) -> Place {
        Place {
            id: id.to_string(),
            name: format!("Place {}", id),
            description: String::new(),
            address: String::new(),
            location: GeoPoint::new(lat, lon),
            rating,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: Category::Restaurant,
            images: vec![],
            price_range: None,
            hours: None,
            open_now: None,
            phone: None,
            instagram: None,
            website: None,
            menu_url: None,
        }
    }

    #[test]
    fn test_proximity_bonus_bands() {
        assert_eq!(proximity_bonus(0.0), 0.5);
        assert_eq!(proximity_bonus(1.99), 0.5);
        assert_eq!(proximity_bonus(2.0), 0.2);
        assert_eq!(proximity_bonus(4.99), 0.2);
        assert_eq!(proximity_bonus(5.0), 0.0);
        assert_eq!(proximity_bonus(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_rating_adjustment() {
        assert!((rating_adjustment(4.5, 4.0) - 0.15).abs() < 1e-9);
        assert_eq!(rating_adjustment(4.0, 4.0), 0.0);
        assert_eq!(rating_adjustment(3.9, 4.0), -2.0);
    }

    #[test]
    fn test_relevance_score_at_user_location() {
        let place = create_test_place("1", 4.0, BAKU_CENTER.latitude, BAKU_CENTER.longitude, &["romantic", "view"]);
        let tags = vec!["romantic".to_string()];

        let score = relevance_score(&place, BAKU_CENTER.latitude, BAKU_CENTER.longitude, &tags, 0.0);

        // 4.0 + 0.5 + 1.2 + 0.5
        assert!((score - 6.2).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_invalid_location_gets_no_proximity_bonus() {
        let place = create_test_place("1", 4.0, f64::NAN, 200.0, &[]);
        let score = relevance_score(&place, BAKU_CENTER.latitude, BAKU_CENTER.longitude, &[], 0.0);
        assert!((score - 5.2).abs() < 1e-9);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let places = vec![
            create_test_place("a", 4.0, 41.0, 49.0, &[]),
            create_test_place("b", 4.5, 41.0, 49.0, &[]),
            create_test_place("c", 4.0, 41.0, 49.0, &[]),
            create_test_place("d", 4.0, 41.0, 49.0, &[]),
        ];

        let ranked = rank_by_relevance(&places, BAKU_CENTER.latitude, BAKU_CENTER.longitude, &[], 0.0);
        let ids: Vec<&str> = ranked.iter().map(|(p, _)| p.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "a", "c", "d"]);
        // Input untouched
        assert_eq!(places[0].id, "a");
    }

    #[test]
    fn test_suggestion_score_components() {
        let mut place = create_test_place("1", 4.0, 41.0, 49.0, &["romantic"]);
        place.category = Category::Museum;
        place.price_range = Some(PriceRange::Moderate);

        let mut prefs = PreferenceSignal::default();
        prefs.toggle_tag("romantic");
        prefs.toggle_category(Category::Museum);

        // 4.0 + 0.5 + 1.2 + 0.8 + 0
        let score = suggestion_score(&place, &prefs, 0.0, &[]);
        assert!((score - 6.5).abs() < 1e-9, "got {}", score);

        prefs.toggle_price_range(PriceRange::Moderate);
        let score = suggestion_score(&place, &prefs, 0.0, &[]);
        assert!((score - 7.5).abs() < 1e-9, "got {}", score);

        prefs.toggle_price_range(PriceRange::Moderate);
        prefs.toggle_price_range(PriceRange::Budget);
        let score = suggestion_score(&place, &prefs, 0.0, &[]);
        assert!((score - 6.0).abs() < 1e-9, "got {}", score);

        let score = suggestion_score(&place, &prefs, 0.0, &["1"]);
        assert!((score - 5.2).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_unpriced_place_is_penalized_when_prices_preferred() {
        let place = create_test_place("1", 4.0, 41.0, 49.0, &[]);
        let mut prefs = PreferenceSignal::default();
        prefs.toggle_price_range(PriceRange::Budget);

        let score = suggestion_score(&place, &prefs, 0.0, &[]);
        // 4.0 + 1.2 - 0.5
        assert!((score - 4.7).abs() < 1e-9, "got {}", score);
    }
}
