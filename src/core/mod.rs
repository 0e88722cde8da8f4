// Core engine exports
pub mod distance;
pub mod feed;
pub mod filters;
pub mod links;
pub mod scoring;

pub use distance::{distance_km, distance_to_place, bounding_box, is_within_bounding_box, BAKU_CENTER};
pub use feed::FeedComposer;
pub use filters::apply_filters;
pub use links::Platform;
pub use scoring::{relevance_score, rank_by_relevance, suggestion_score};
