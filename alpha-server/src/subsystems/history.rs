use alpha_core::{merge_history, HistoryEntry, Result, HISTORY_LIMIT};
use sqlx::PgPool;
use uuid::Uuid;

use super::{doses, meals, symptoms};

/// Newest-first activity feed across doses, meals and symptoms.
pub async fn fetch_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<HistoryEntry>> {
    let limit = HISTORY_LIMIT as i64;
    let (doses, meals, symptoms) = tokio::try_join!(
        doses::recent_doses(pool, user_id, limit),
        meals::recent_meals(pool, user_id, limit),
        symptoms::recent_symptoms(pool, user_id, limit),
    )?;
    Ok(merge_history(doses, meals, symptoms, HISTORY_LIMIT))
}
