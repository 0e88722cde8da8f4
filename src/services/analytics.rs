use crate::models::{AnalyticsEvent, DecisionSpeedSummary, EventName, FavoritesSummary};
use crate::services::store::{LocalStore, StoreError};
use serde_json::Value;
use std::collections::HashSet;

/// Maximum number of events kept on the device
pub const MAX_EVENTS: usize = 200;

/// Build an event stamped with the current time
pub fn new_event(name: EventName, data: Option<Value>) -> AnalyticsEvent {
    AnalyticsEvent {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        timestamp: chrono::Utc::now().timestamp_millis(),
        data,
    }
}

/// Record an event, trimming the log to [`MAX_EVENTS`]
pub async fn log_event(
    store: &LocalStore,
    name: EventName,
    data: Option<Value>,
) -> Result<AnalyticsEvent, StoreError> {
    let event = new_event(name, data);
    store.append_event(&event, MAX_EVENTS).await?;
    tracing::debug!("Analytics event {} ({})", event.name.as_str(), event.id);
    Ok(event)
}

/// Record an event without surfacing failures to the caller
pub async fn track(store: &LocalStore, name: EventName, data: Option<Value>) {
    if let Err(e) = log_event(store, name, data).await {
        tracing::warn!("Failed to record {} event: {}", name.as_str(), e);
    }
}

fn payload<'a>(event: &'a AnalyticsEvent, key: &str) -> Option<&'a Value> {
    event.data.as_ref().and_then(|data| data.get(key))
}

/// Boolean flag, `None` when absent or not a boolean
fn payload_flag(event: &AnalyticsEvent, key: &str) -> Option<bool> {
    payload(event, key).and_then(Value::as_bool)
}

/// Numeric field, also accepting numeric strings; anything else reads as 0
fn payload_f64(event: &AnalyticsEvent, key: &str) -> f64 {
    let value = match payload(event, key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Save (`Some(true)`) or unsave (`Some(false)`) marker of a toggle event
///
/// Accepts `action: "save" | "unsave"` as well as `saved: true | false`.
fn toggle_direction(event: &AnalyticsEvent) -> Option<bool> {
    match payload(event, "action").and_then(Value::as_str) {
        Some("save") => Some(true),
        Some("unsave") => Some(false),
        _ => payload_flag(event, "saved"),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Average time from opening the app to opening a place, with and without filters
pub fn summarize_decision_speed(events: &[AnalyticsEvent]) -> DecisionSpeedSummary {
    let elapsed = |filter_used: bool| -> Vec<f64> {
        events
            .iter()
            .filter(|event| event.name == EventName::PlaceOpened)
            .filter(|event| payload_flag(event, "filterUsed") == Some(filter_used))
            .map(|event| payload_f64(event, "elapsedMs"))
            .collect()
    };
    let with_ms = elapsed(true);
    let without_ms = elapsed(false);

    DecisionSpeedSummary {
        sample_with_filters: with_ms.len(),
        sample_without_filters: without_ms.len(),
        avg_ms_with_filters: mean(&with_ms),
        avg_ms_without_filters: mean(&without_ms),
    }
}

pub fn summarize_favorites(events: &[AnalyticsEvent]) -> FavoritesSummary {
    let toggles: Vec<&AnalyticsEvent> = events
        .iter()
        .filter(|event| event.name == EventName::FavoriteToggled)
        .collect();

    let mut summary = FavoritesSummary {
        total_events: toggles.len(),
        ..Default::default()
    };
    let mut saved_places = HashSet::new();

    for event in &toggles {
        match toggle_direction(event) {
            Some(true) => {
                summary.saves += 1;
                if let Some(id) = payload(event, "placeId").and_then(Value::as_str) {
                    saved_places.insert(id.to_string());
                }
            }
            Some(false) => summary.unsaves += 1,
            None => {}
        }
    }

    summary.unique_places_saved = saved_places.len();
    summary.last_total_favorites = toggles
        .last()
        .and_then(|event| payload(event, "totalFavorites"))
        .and_then(Value::as_u64);

    summary
}
