use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StreakCounter {
    pub user_id: Uuid,
    pub current_count: i32,
    pub last_dose_date: Option<DateTime<Utc>>,
}
