use serde::{Deserialize, Serialize};
use validator::Validate;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "lng", alias = "longitude")]
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both values finite and inside the valid degree ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to another point in kilometers
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        crate::core::distance::distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Closed set of place categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Cafe,
    Bar,
    Park,
    Museum,
    Landmark,
    Shopping,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Restaurant,
        Category::Cafe,
        Category::Bar,
        Category::Park,
        Category::Museum,
        Category::Landmark,
        Category::Shopping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Bar => "bar",
            Category::Park => "park",
            Category::Museum => "museum",
            Category::Landmark => "landmark",
            Category::Shopping => "shopping",
        }
    }
}

/// Price tier of a place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Budget,
    Moderate,
    Expensive,
}

impl PriceRange {
    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::Budget => "$",
            PriceRange::Moderate => "$$",
            PriceRange::Expensive => "$$$",
        }
    }
}

/// Immutable catalog entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub location: GeoPoint,
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    /// Tri-state: `None` means unknown, distinct from `Some(false)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_url: Option<String>,
}

impl Place {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Only an explicit `Some(true)` counts as open
    pub fn is_open_now(&self) -> bool {
        self.open_now == Some(true)
    }
}

/// Hard constraints narrowing the catalog for one search session
///
/// An empty set or zero value on any axis means "no constraint". Axes
/// combine with AND; values within a multi-valued axis combine with OR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveFilters {
    #[validate(length(max = 200))]
    pub query: String,
    pub tags: Vec<String>,
    pub categories: Vec<Category>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: f64,
    pub price_range: Vec<PriceRange>,
    #[validate(range(min = 0.0))]
    pub max_distance: Option<f64>,
    pub open_now: bool,
}

impl ActiveFilters {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        toggle(&mut self.tags, tag.into());
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.categories, category);
    }

    pub fn set_min_rating(&mut self, rating: f64) {
        self.min_rating = rating;
    }

    pub fn toggle_price_range(&mut self, price_range: PriceRange) {
        toggle(&mut self.price_range, price_range);
    }

    pub fn set_max_distance(&mut self, distance_km: Option<f64>) {
        self.max_distance = distance_km;
    }

    pub fn set_open_now(&mut self, open_now: bool) {
        self.open_now = open_now;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no axis carries a constraint
    pub fn is_default(&self) -> bool {
        self.query.trim().is_empty()
            && self.tags.is_empty()
            && self.categories.is_empty()
            && self.min_rating <= 0.0
            && self.price_range.is_empty()
            && self.max_distance.is_none()
            && !self.open_now
    }
}

/// Soft ranking inputs gathered during onboarding and edited on the profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceSignal {
    pub tags: Vec<String>,
    pub categories: Vec<Category>,
    pub price_ranges: Vec<PriceRange>,
    pub completed: bool,
}

impl PreferenceSignal {
    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        toggle(&mut self.tags, tag.into());
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_price_range(&mut self, price_range: PriceRange) {
        toggle(&mut self.price_ranges, price_range);
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Device location reading as reported by the location provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationEstimate {
    #[serde(rename = "lat", alias = "latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[serde(rename = "lng", alias = "longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl LocationEstimate {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    fn is_resolved(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    /// Coordinate for ranking views; the fallback while loading or after an error
    pub fn resolved(&self, fallback: GeoPoint) -> GeoPoint {
        if self.is_resolved() {
            self.point()
        } else {
            fallback
        }
    }

    /// Coordinate for the distance filter; `None` disables distance filtering
    pub fn for_filtering(&self) -> Option<GeoPoint> {
        self.is_resolved().then(|| self.point())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
}

/// Device-level app settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub location_enabled: bool,
    pub distance_unit: DistanceUnit,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            location_enabled: true,
            distance_unit: DistanceUnit::Km,
        }
    }
}

/// Outcome of toggling a favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub place_id: String,
    pub saved: bool,
    pub total_favorites: usize,
}

/// Analytics event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    PlaceOpened,
    FiltersUsed,
    FavoriteToggled,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::PlaceOpened => "place_opened",
            EventName::FiltersUsed => "filters_used",
            EventName::FavoriteToggled => "favorite_toggled",
        }
    }
}

/// Lightweight on-device analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: String,
    pub name: EventName,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Place annotated with its distance from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    #[serde(flatten)]
    pub place: Place,
    pub distance_km: f64,
}

/// Place annotated with the score it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPlace {
    #[serde(flatten)]
    pub place: Place,
    pub score: f64,
}

/// The three derived home feed sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub near_you: Vec<NearbyPlace>,
    pub suggested: Vec<ScoredPlace>,
    pub open_now: Vec<Place>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Remove `item` if present, otherwise append it
fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|existing| *existing == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}
