// Service exports
pub mod analytics;
pub mod cache;
pub mod catalog;
pub mod store;

pub use cache::{FeedCache, FeedKey};
pub use catalog::{Catalog, CatalogError};
pub use store::{LocalStore, StoreError};
