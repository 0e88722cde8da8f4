use crate::models::{CacheStats, GeoPoint, HomeFeed, PreferenceSignal};
use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// Memoizes composed home feeds
///
/// Entries are keyed by a fingerprint of every input the composition reads,
/// so a hit is indistinguishable from recomputing. Nothing needs explicit
/// invalidation; a changed input produces a different key.
pub struct FeedCache {
    feeds: moka::future::Cache<u64, Arc<HomeFeed>>,
}

impl FeedCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let feeds = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { feeds }
    }

    /// Return the cached feed for `key`, composing it on a miss
    ///
    /// Concurrent misses for the same key run `compose` once.
    pub async fn get_or_compose<F>(&self, key: u64, compose: F) -> Arc<HomeFeed>
    where
        F: Future<Output = HomeFeed>,
    {
        if let Some(feed) = self.feeds.get(&key).await {
            tracing::trace!("Feed cache hit: {:x}", key);
            return feed;
        }

        tracing::trace!("Feed cache miss: {:x}", key);
        self.feeds.get_with(key, async move { Arc::new(compose.await) }).await
    }

    pub fn invalidate_all(&self) {
        self.feeds.invalidate_all();
    }

    /// Current entry counts, after flushing pending evictions
    pub async fn stats(&self) -> CacheStats {
        self.feeds.run_pending_tasks().await;
        CacheStats {
            entries: self.feeds.entry_count(),
        }
    }
}

/// Cache key builder
pub struct FeedKey;

impl FeedKey {
    /// Key for a home feed composed from these inputs
    pub fn home(
        catalog_fingerprint: u64,
        user: GeoPoint,
        preferences: &PreferenceSignal,
        section_limit: usize,
    ) -> u64 {
        let mut hasher = DefaultHasher::new();
        catalog_fingerprint.hash(&mut hasher);
        user.latitude.to_bits().hash(&mut hasher);
        user.longitude.to_bits().hash(&mut hasher);
        preferences.hash(&mut hasher);
        section_limit.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_feed_composed_once_per_key() {
        let cache = FeedCache::new(100, 60);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let feed = cache
                .get_or_compose(42, async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    HomeFeed::default()
                })
                .await;
            assert!(feed.near_you.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate_all();
        cache
            .get_or_compose(42, async {
                calls.fetch_add(1, Ordering::SeqCst);
                HomeFeed::default()
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stats_count_cached_feeds() {
        let cache = FeedCache::new(100, 60);
        assert_eq!(cache.stats().await, CacheStats { entries: 0 });

        cache.get_or_compose(1, async { HomeFeed::default() }).await;
        cache.get_or_compose(2, async { HomeFeed::default() }).await;
        cache.get_or_compose(1, async { HomeFeed::default() }).await;
        assert_eq!(cache.stats().await.entries, 2);

        cache.invalidate_all();
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[test]
    fn test_feed_key_tracks_inputs() {
        let prefs = PreferenceSignal::default();
        let here = GeoPoint::new(40.4093, 49.8671);
        let base = FeedKey::home(1, here, &prefs, 5);

        assert_eq!(base, FeedKey::home(1, here, &prefs, 5));
        assert_ne!(base, FeedKey::home(2, here, &prefs, 5));
        assert_ne!(base, FeedKey::home(1, GeoPoint::new(40.41, 49.8671), &prefs, 5));
        assert_ne!(base, FeedKey::home(1, here, &prefs, 3));

        let mut romantic = PreferenceSignal::default();
        romantic.toggle_tag("romantic");
        assert_ne!(base, FeedKey::home(1, here, &romantic, 5));
    }
}
