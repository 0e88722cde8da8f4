use crate::core::{
    distance::distance_to_place,
    scoring::{sort_by_score_desc, suggestion_score},
};
use crate::models::{GeoPoint, HomeFeed, NearbyPlace, Place, PreferenceSignal, ScoredPlace};
use std::cmp::Ordering;

/// Number of places shown per home feed section
pub const DEFAULT_SECTION_LIMIT: usize = 5;

/// How many of the top "near you" places the suggested feed avoids repeating
pub const DIVERSITY_WINDOW: usize = 2;

/// Minimum rating used for the rating term of suggestion scores
pub const SUGGESTION_MIN_RATING: f64 = 0.0;

/// Builds the derived home feed views
///
/// # Sections
/// 1. Near you: ascending distance from the user
/// 2. Suggested for you: preference-driven score with a diversity penalty
/// 3. Open now: places explicitly open, in catalog order
///
/// Every call recomputes from its arguments; nothing is retained.
#[derive(Debug, Clone, Copy)]
pub struct FeedComposer {
    section_limit: usize,
}

impl FeedComposer {
    pub fn new(section_limit: usize) -> Self {
        Self { section_limit }
    }

    pub fn section_limit(&self) -> usize {
        self.section_limit
    }

    /// Places sorted by ascending distance to the user, closest first
    ///
    /// Equal distances keep catalog order. Places with invalid coordinates
    /// sort last.
    pub fn near_you<'a>(&self, places: &'a [Place], user: GeoPoint) -> Vec<(&'a Place, f64)> {
        let mut near = by_distance(places, user);
        near.truncate(self.section_limit);
        near
    }

    /// Top places by suggestion score
    ///
    /// `near_you_top` holds the ids of the leading "near you" places; they
    /// still qualify, but carry the diversity penalty.
    pub fn suggested<'a>(
        &self,
        places: &'a [Place],
        preferences: &PreferenceSignal,
        near_you_top: &[&str],
    ) -> Vec<(&'a Place, f64)> {
        let scored = places
            .iter()
            .map(|place| {
                let score = suggestion_score(place, preferences, SUGGESTION_MIN_RATING, near_you_top);
                (place, score)
            })
            .collect();

        let mut ranked = sort_by_score_desc(scored);
        ranked.truncate(self.section_limit);
        ranked
    }

    /// Places whose `open_now` is explicitly true, in catalog order
    pub fn open_now<'a>(&self, places: &'a [Place]) -> Vec<&'a Place> {
        places
            .iter()
            .filter(|place| place.is_open_now())
            .take(self.section_limit)
            .collect()
    }

    /// Compose all three home feed sections
    pub fn compose(
        &self,
        places: &[Place],
        user: GeoPoint,
        preferences: &PreferenceSignal,
    ) -> HomeFeed {
        let mut near_you = by_distance(places, user);

        // Diversity window is independent of the display limit
        let near_you_top: Vec<&str> = near_you
            .iter()
            .take(DIVERSITY_WINDOW)
            .map(|(place, _)| place.id.as_str())
            .collect();
        near_you.truncate(self.section_limit);

        let suggested = self.suggested(places, preferences, &near_you_top);
        let open_now = self.open_now(places);

        tracing::debug!(
            "Composed home feed: {} near, {} suggested, {} open (from {} places)",
            near_you.len(),
            suggested.len(),
            open_now.len(),
            places.len()
        );

        HomeFeed {
            near_you: near_you
                .into_iter()
                .map(|(place, distance_km)| NearbyPlace {
                    place: place.clone(),
                    distance_km,
                })
                .collect(),
            suggested: suggested
                .into_iter()
                .map(|(place, score)| ScoredPlace {
                    place: place.clone(),
                    score,
                })
                .collect(),
            open_now: open_now.into_iter().cloned().collect(),
        }
    }
}

/// Every place with its distance to `user`, stable ascending sort
fn by_distance(places: &[Place], user: GeoPoint) -> Vec<(&Place, f64)> {
    let mut sorted: Vec<(&Place, f64)> = places
        .iter()
        .map(|place| (place, distance_to_place(user, place)))
        .collect();

    sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    sorted
}

impl Default for FeedComposer {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_LIMIT)
    }
}
