use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SEVERITY: i32 = 1;
pub const MAX_SEVERITY: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SymptomEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub severity: i32,
    pub description: String,
    /// Meal this symptom was attributed to when it was logged
    pub meal_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

pub fn severity_in_range(severity: i32) -> bool {
    (MIN_SEVERITY..=MAX_SEVERITY).contains(&severity)
}
