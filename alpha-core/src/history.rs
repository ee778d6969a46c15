use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{DoseEvent, MealEvent, SymptomEvent};

/// Maximum number of entries in a history feed.
pub const HISTORY_LIMIT: usize = 50;

/// One row of the activity feed, tagged by kind in a `type` field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryEntry {
    Dose(DoseEvent),
    Meal(MealEvent),
    Symptom(SymptomEvent),
}

impl HistoryEntry {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryEntry::Dose(d) => d.timestamp,
            HistoryEntry::Meal(m) => m.timestamp,
            HistoryEntry::Symptom(s) => s.timestamp,
        }
    }
}

/// Merge the three event streams newest first and keep at most `limit` entries.
pub fn merge_history(
    doses: Vec<DoseEvent>,
    meals: Vec<MealEvent>,
    symptoms: Vec<SymptomEvent>,
    limit: usize,
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = doses
        .into_iter()
        .map(HistoryEntry::Dose)
        .chain(meals.into_iter().map(HistoryEntry::Meal))
        .chain(symptoms.into_iter().map(HistoryEntry::Symptom))
        .collect();

    entries.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    entries.truncate(limit);
    entries
}
