//! Property-based tests for the discovery core.
//!
//! # Invariants tested
//!
//! - **Distance:** zero on identical points, symmetric, obeys the triangle inequality.
//! - **Filter identity:** default filters keep every place in order.
//! - **Filter idempotence:** filtering a filtered list changes nothing.
//! - **Filter soundness:** every kept place satisfies every active axis.
//! - **Stable ranking:** scores never increase and ties keep input order,
//!   both over the catalog and over filtered results.

use proptest::prelude::*;
use wheretobaku::core::distance::{distance_km, distance_to_place};
use wheretobaku::core::filters::{
    matches_categories, matches_min_rating, matches_price_range, matches_query, matches_tags, normalize_query,
};
use wheretobaku::core::{apply_filters, rank_by_relevance};
use wheretobaku::models::{ActiveFilters, Category, GeoPoint, Place, PriceRange};

const TAG_POOL: [&str; 6] = ["romantic", "view", "tea", "music", "family", "history"];
const QUERY_POOL: [&str; 5] = ["", "tower", "TEA", " park ", "baku"];

fn coord_strategy() -> impl Strategy<Value = (f64, f64)> {
    (-89.0f64..89.0, -179.0f64..179.0)
}

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn price_strategy() -> impl Strategy<Value = PriceRange> {
    prop::sample::select(vec![PriceRange::Budget, PriceRange::Moderate, PriceRange::Expensive])
}

fn tags_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(TAG_POOL.to_vec(), 0..=3)
        .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
}

fn place_strategy() -> impl Strategy<Value = Place> {
    (
        (40.2f64..40.6, 49.6f64..50.1),
        0.0f64..=5.0,
        tags_strategy(),
        category_strategy(),
        prop::option::of(price_strategy()),
        prop::option::of(any::<bool>()),
        prop::sample::select(vec!["Maiden Tower", "Tea House", "Park Bulvar", "Old City Gate"]),
    )
        .prop_map(|((lat, lon), rating, tags, category, price_range, open_now, name)| Place {
            id: String::new(),
            name: name.to_string(),
            description: String::new(),
            address: "Baku".to_string(),
            location: GeoPoint::new(lat, lon),
            rating,
            tags,
            category,
            images: vec![],
            price_range,
            hours: None,
            open_now,
            phone: None,
            instagram: None,
            website: None,
            menu_url: None,
        })
}

/// Places with ids equal to their catalog index
fn catalog_strategy() -> impl Strategy<Value = Vec<Place>> {
    prop::collection::vec(place_strategy(), 0..30).prop_map(|mut places| {
        for (i, place) in places.iter_mut().enumerate() {
            place.id = i.to_string();
        }
        places
    })
}

fn filters_strategy() -> impl Strategy<Value = ActiveFilters> {
    (
        prop::sample::select(QUERY_POOL.to_vec()),
        tags_strategy(),
        prop::sample::subsequence(Category::ALL.to_vec(), 0..=2),
        prop::sample::select(vec![0.0, 3.0, 4.0, 4.5]),
        prop::sample::subsequence(vec![PriceRange::Budget, PriceRange::Moderate, PriceRange::Expensive], 0..=2),
        prop::option::of(0.5f64..30.0),
        any::<bool>(),
    )
        .prop_map(|(query, tags, categories, min_rating, price_range, max_distance, open_now)| ActiveFilters {
            query: query.to_string(),
            tags,
            categories,
            min_rating,
            price_range,
            max_distance,
            open_now,
        })
}

fn index_of(place: &Place) -> usize {
    place.id.parse().unwrap_or(usize::MAX)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_distance_to_self_is_zero((lat, lon) in coord_strategy()) {
        prop_assert!(distance_km(lat, lon, lat, lon).abs() < 1e-9);
    }

    #[test]
    fn prop_distance_is_symmetric(a in coord_strategy(), b in coord_strategy()) {
        let ab = distance_km(a.0, a.1, b.0, b.1);
        let ba = distance_km(b.0, b.1, a.0, a.1);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
    }

    #[test]
    fn prop_distance_triangle_inequality(a in coord_strategy(), b in coord_strategy(), c in coord_strategy()) {
        let ac = distance_km(a.0, a.1, c.0, c.1);
        let ab = distance_km(a.0, a.1, b.0, b.1);
        let bc = distance_km(b.0, b.1, c.0, c.1);
        // Rounding slack for near-antipodal pairs
        prop_assert!(ac <= ab + bc + 0.25, "{} > {} + {}", ac, ab, bc);
    }

    #[test]
    fn prop_default_filters_are_identity(places in catalog_strategy(), user in prop::option::of(coord_strategy())) {
        let user = user.map(|(lat, lon)| GeoPoint::new(lat, lon));
        let result = apply_filters(&places, &ActiveFilters::default(), user);

        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        let expected: Vec<&str> = places.iter().map(|p| p.id.as_str()).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_filters_are_idempotent(places in catalog_strategy(), filters in filters_strategy()) {
        let user = Some(GeoPoint::new(40.4093, 49.8671));
        let once = apply_filters(&places, &filters, user);
        let twice = apply_filters(once.iter().copied(), &filters, user);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_filters_are_sound(places in catalog_strategy(), filters in filters_strategy()) {
        let user = GeoPoint::new(40.4093, 49.8671);
        let result = apply_filters(&places, &filters, Some(user));
        let query = normalize_query(&filters.query);

        let mut last_index = None;
        for place in result {
            prop_assert!(matches_tags(place, &filters.tags));
            prop_assert!(matches_categories(place, &filters.categories));
            prop_assert!(matches_min_rating(place, filters.min_rating));
            prop_assert!(matches_price_range(place, &filters.price_range));
            if filters.open_now {
                prop_assert_eq!(place.open_now, Some(true));
            }
            if let Some(max_km) = filters.max_distance {
                prop_assert!(distance_to_place(user, place) <= max_km);
            }
            if let Some(q) = query.as_deref() {
                prop_assert!(matches_query(place, q));
            }

            // Catalog order preserved
            let index = index_of(place);
            prop_assert!(last_index.map_or(true, |last| last < index));
            last_index = Some(index);
        }
    }

    #[test]
    fn prop_distance_filter_needs_location(places in catalog_strategy(), max_km in 0.0f64..1.0) {
        let mut filters = ActiveFilters::default();
        filters.set_max_distance(Some(max_km));

        prop_assert_eq!(apply_filters(&places, &filters, None).len(), places.len());
    }

    #[test]
    fn prop_rank_is_stable(
        places in catalog_strategy(),
        (lat, lon) in (40.2f64..40.6, 49.6f64..50.1),
        tags in tags_strategy(),
        min_rating in prop::sample::select(vec![0.0, 3.5, 4.0]),
    ) {
        let ranked = rank_by_relevance(&places, lat, lon, &tags, min_rating);
        prop_assert_eq!(ranked.len(), places.len());

        for pair in ranked.windows(2) {
            let (a, score_a) = pair[0];
            let (b, score_b) = pair[1];
            prop_assert!(score_a >= score_b);
            if score_a == score_b {
                prop_assert!(index_of(a) < index_of(b));
            }
        }
    }

    #[test]
    fn prop_rank_of_filtered_is_stable(places in catalog_strategy(), filters in filters_strategy()) {
        let user = GeoPoint::new(40.4093, 49.8671);
        let filtered = apply_filters(&places, &filters, Some(user));
        let expected = filtered.len();

        let ranked = rank_by_relevance(filtered, user.latitude, user.longitude, &filters.tags, filters.min_rating);
        prop_assert_eq!(ranked.len(), expected);

        for pair in ranked.windows(2) {
            let (a, score_a) = pair[0];
            let (b, score_b) = pair[1];
            prop_assert!(score_a >= score_b);
            if score_a == score_b {
                prop_assert!(index_of(a) < index_of(b));
            }
        }
    }
}
