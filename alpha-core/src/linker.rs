//! Symptom → meal attribution.
//!
//! A symptom logged without an explicit meal is attached to the user's most
//! recent meal when that meal is younger than [`LINK_WINDOW_HOURS`]. The link
//! is decided once, at creation; later meals never rewrite older symptoms.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::MealEvent;

/// Look-back window for automatic linking (exclusive upper bound).
pub const LINK_WINDOW_HOURS: i64 = 4;

pub fn link_window() -> Duration {
    Duration::hours(LINK_WINDOW_HOURS)
}

/// Pick the meal id for a symptom logged at `logged_at`.
///
/// `explicit` wins when present; ownership is checked by the caller.
/// Otherwise `latest_meal` is linked when its age is strictly under the window.
pub fn resolve_meal_link(
    explicit: Option<Uuid>,
    latest_meal: Option<&MealEvent>,
    logged_at: DateTime<Utc>,
) -> Option<Uuid> {
    if explicit.is_some() {
        return explicit;
    }

    let meal = latest_meal?;
    let age = logged_at - meal.timestamp;
    if age < link_window() {
        Some(meal.id)
    } else {
        None
    }
}
