use crate::models::{AnalyticsEvent, AppSettings, EventName, FavoriteToggle, PreferenceSignal};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage keys
pub const FAVORITES_KEY: &str = "@WhereToBaku:favorites";
pub const PREFERENCES_KEY: &str = "@WhereToBaku:onboardingPrefs";
pub const SETTINGS_KEY: &str = "@WhereToBaku:appSettings";

/// Errors that can occur when interacting with the local database
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// On-device key-value store backed by SQLite
///
/// Every write is an upsert, so the last write for a key wins. Compound
/// read-modify-write operations (favorite toggles) are serialized through
/// an in-process lock.
pub struct LocalStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Open (or create) the database and run migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // In-memory databases live only as long as their single connection
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Local store ready at {}", database_url);

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }

    /// Fresh in-memory store, used by tests and ephemeral sessions
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Get a value by key
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let json: String = row.get("value");
                tracing::trace!("Store hit: {}", key);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Set a value by key, replacing any previous value
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(json)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        tracing::trace!("Store set: {}", key);
        Ok(())
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Read a value, falling back to its default when missing or unreadable
    async fn get_or_default<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.get(key).await {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(StoreError::SerializationError(e)) => {
                tracing::warn!("Discarding unreadable value for {}: {}", key, e);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn favorites(&self) -> Result<Vec<String>, StoreError> {
        self.get_or_default(FAVORITES_KEY).await
    }

    pub async fn is_favorite(&self, place_id: &str) -> Result<bool, StoreError> {
        Ok(self.favorites().await?.iter().any(|id| id == place_id))
    }

    /// Save the place if it is not saved yet, otherwise unsave it
    pub async fn toggle_favorite(&self, place_id: &str) -> Result<FavoriteToggle, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut favorites = self.favorites().await?;
        let saved = match favorites.iter().position(|id| id == place_id) {
            Some(pos) => {
                favorites.remove(pos);
                false
            }
            None => {
                favorites.push(place_id.to_string());
                true
            }
        };
        self.set(FAVORITES_KEY, &favorites).await?;

        tracing::debug!("Favorite {} -> saved={} ({} total)", place_id, saved, favorites.len());

        Ok(FavoriteToggle {
            place_id: place_id.to_string(),
            saved,
            total_favorites: favorites.len(),
        })
    }

    /// Remove all saved places, returning how many were removed
    pub async fn clear_favorites(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let cleared = self.favorites().await?.len();
        self.set(FAVORITES_KEY, &Vec::<String>::new()).await?;

        tracing::info!("Cleared {} favorites", cleared);
        Ok(cleared)
    }

    pub async fn preferences(&self) -> Result<PreferenceSignal, StoreError> {
        self.get_or_default(PREFERENCES_KEY).await
    }

    pub async fn save_preferences(&self, preferences: &PreferenceSignal) -> Result<(), StoreError> {
        self.set(PREFERENCES_KEY, preferences).await
    }

    pub async fn settings(&self) -> Result<AppSettings, StoreError> {
        self.get_or_default(SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        self.set(SETTINGS_KEY, settings).await
    }

    /// Append an analytics event, keeping only the newest `retain` events
    pub async fn append_event(&self, event: &AnalyticsEvent, retain: usize) -> Result<(), StoreError> {
        let data = event.data.as_ref().map(serde_json::to_string).transpose()?;

        sqlx::query("INSERT INTO analytics_events (id, name, timestamp, data) VALUES (?1, ?2, ?3, ?4)")
            .bind(&event.id)
            .bind(event.name.as_str())
            .bind(event.timestamp)
            .bind(data)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM analytics_events
            WHERE seq NOT IN (
                SELECT seq FROM analytics_events ORDER BY seq DESC LIMIT ?1
            )
            "#,
        )
        .bind(retain as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All retained analytics events, oldest first
    pub async fn events(&self) -> Result<Vec<AnalyticsEvent>, StoreError> {
        let rows = sqlx::query("SELECT id, name, timestamp, data FROM analytics_events ORDER BY seq ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("name");
            // Rows written by a newer build may carry unknown names
            let Ok(name) = serde_json::from_value::<EventName>(serde_json::Value::String(name)) else {
                continue;
            };
            let data: Option<String> = row.get("data");
            events.push(AnalyticsEvent {
                id: row.get("id"),
                name,
                timestamp: row.get("timestamp"),
                data: data.map(|raw| serde_json::from_str(&raw)).transpose()?,
            });
        }

        Ok(events)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
