//! Symptoms subsystem — symptom logging with meal attribution

use alpha_core::linker::resolve_meal_link;
use alpha_core::models::symptom::{severity_in_range, MAX_SEVERITY, MIN_SEVERITY};
use alpha_core::models::SymptomEvent;
use alpha_core::{AlphaError, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::meals;

#[derive(Debug, Clone)]
pub struct NewSymptom {
    pub severity: i32,
    pub description: String,
    pub meal_id: Option<Uuid>,
}

pub async fn recent_symptoms<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<SymptomEvent>> {
    let symptoms = sqlx::query_as::<_, SymptomEvent>(
        r#"
        SELECT id, user_id, severity, description, meal_id, timestamp
        FROM symptoms
        WHERE user_id = $1
        ORDER BY timestamp DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;
    Ok(symptoms)
}

/// Record a symptom at `now`, attributing it to a meal.
///
/// An explicit `meal_id` must belong to the user. Without one, the latest meal
/// is linked when it is inside the look-back window.
pub async fn log_symptom(
    pool: &PgPool,
    user_id: Uuid,
    new: NewSymptom,
    now: DateTime<Utc>,
) -> Result<SymptomEvent> {
    if !severity_in_range(new.severity) {
        return Err(AlphaError::Validation(format!(
            "severity must be between {} and {}",
            MIN_SEVERITY, MAX_SEVERITY
        )));
    }

    let mut tx = pool.begin().await?;

    let meal_id = match new.meal_id {
        Some(id) => {
            if meals::find_owned_meal(&mut *tx, user_id, id).await?.is_none() {
                return Err(AlphaError::NotFound(format!("Meal {} not found", id)));
            }
            resolve_meal_link(Some(id), None, now)
        }
        None => {
            let latest = meals::latest_meal(&mut *tx, user_id).await?;
            resolve_meal_link(None, latest.as_ref(), now)
        }
    };

    let symptom = sqlx::query_as::<_, SymptomEvent>(
        r#"
        INSERT INTO symptoms (user_id, severity, description, meal_id, timestamp)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, severity, description, meal_id, timestamp
        "#,
    )
    .bind(user_id)
    .bind(new.severity)
    .bind(new.description.trim())
    .bind(meal_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        symptom_id = %symptom.id,
        severity = symptom.severity,
        meal_id = ?symptom.meal_id,
        "Symptom logged"
    );
    Ok(symptom)
}
