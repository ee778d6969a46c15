//! Doses subsystem — dose logging, streak upkeep and protection status

use alpha_core::models::{DoseEvent, StreakCounter};
use alpha_core::protection::{calculate_protection_status, ProtectionStatus};
use alpha_core::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// `/status` payload: protection state plus streak.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub protection: ProtectionStatus,
    pub last_dose_at: Option<DateTime<Utc>>,
    pub streak: i32,
}

pub async fn latest_dose<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<DoseEvent>> {
    let dose = sqlx::query_as::<_, DoseEvent>(
        r#"
        SELECT id, user_id, timestamp
        FROM dose_logs
        WHERE user_id = $1
        ORDER BY timestamp DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(dose)
}

pub async fn recent_doses<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<DoseEvent>> {
    let doses = sqlx::query_as::<_, DoseEvent>(
        r#"
        SELECT id, user_id, timestamp
        FROM dose_logs
        WHERE user_id = $1
        ORDER BY timestamp DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;
    Ok(doses)
}

pub async fn get_streak<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<StreakCounter>> {
    let streak = sqlx::query_as::<_, StreakCounter>(
        "SELECT user_id, current_count, last_dose_date FROM streaks WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(streak)
}

/// Record a dose at `now` and bump the streak, atomically.
///
/// The streak increments on every dose; there is no calendar-day guard.
pub async fn log_dose(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(DoseEvent, StreakCounter)> {
    let mut tx = pool.begin().await?;

    let dose = sqlx::query_as::<_, DoseEvent>(
        r#"
        INSERT INTO dose_logs (user_id, timestamp)
        VALUES ($1, $2)
        RETURNING id, user_id, timestamp
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let streak = sqlx::query_as::<_, StreakCounter>(
        r#"
        INSERT INTO streaks (user_id, current_count, last_dose_date)
        VALUES ($1, 1, $2)
        ON CONFLICT (user_id)
        DO UPDATE SET
            current_count = streaks.current_count + 1,
            last_dose_date = EXCLUDED.last_dose_date
        RETURNING user_id, current_count, last_dose_date
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        dose_id = %dose.id,
        streak = streak.current_count,
        "Dose logged"
    );
    Ok((dose, streak))
}

pub async fn current_status(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<StatusReport> {
    let last_dose_at = latest_dose(pool, user_id).await?.map(|d| d.timestamp);
    let streak = get_streak(pool, user_id)
        .await?
        .map(|s| s.current_count)
        .unwrap_or(0);

    Ok(StatusReport {
        protection: calculate_protection_status(last_dose_at, now),
        last_dose_at,
        streak,
    })
}
