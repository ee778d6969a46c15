//! Meals subsystem — meal logging and the lookups symptom linking needs

use alpha_core::models::{MealEvent, RiskLevel};
use alpha_core::validation::{require_non_empty, MAX_FOOD_ITEM_LEN};
use alpha_core::{AlphaError, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

pub async fn insert_meal<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    food_item: &str,
    risk_level: RiskLevel,
    at: DateTime<Utc>,
) -> Result<MealEvent> {
    let meal = sqlx::query_as::<_, MealEvent>(
        r#"
        INSERT INTO meal_logs (user_id, food_item, risk_level, timestamp)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, food_item, risk_level, timestamp
        "#,
    )
    .bind(user_id)
    .bind(food_item)
    .bind(risk_level)
    .bind(at)
    .fetch_one(executor)
    .await?;
    Ok(meal)
}

/// The user's most recent meal, if any.
pub async fn latest_meal<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<MealEvent>> {
    let meal = sqlx::query_as::<_, MealEvent>(
        r#"
        SELECT id, user_id, food_item, risk_level, timestamp
        FROM meal_logs
        WHERE user_id = $1
        ORDER BY timestamp DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(meal)
}

/// Fetch a meal only if it belongs to `user_id`.
pub async fn find_owned_meal<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    meal_id: Uuid,
) -> Result<Option<MealEvent>> {
    let meal = sqlx::query_as::<_, MealEvent>(
        r#"
        SELECT id, user_id, food_item, risk_level, timestamp
        FROM meal_logs
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(meal)
}

pub async fn recent_meals<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<MealEvent>> {
    let meals = sqlx::query_as::<_, MealEvent>(
        r#"
        SELECT id, user_id, food_item, risk_level, timestamp
        FROM meal_logs
        WHERE user_id = $1
        ORDER BY timestamp DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;
    Ok(meals)
}

pub async fn log_meal(
    pool: &PgPool,
    user_id: Uuid,
    food_item: &str,
    risk_level: RiskLevel,
    now: DateTime<Utc>,
) -> Result<MealEvent> {
    let food_item = require_non_empty("food_item", food_item)?;
    if food_item.chars().count() > MAX_FOOD_ITEM_LEN {
        return Err(AlphaError::Validation(format!(
            "food_item must be at most {} characters",
            MAX_FOOD_ITEM_LEN
        )));
    }

    let meal = insert_meal(pool, user_id, food_item, risk_level, now).await?;
    tracing::info!(
        user_id = %user_id,
        meal_id = %meal.id,
        risk = meal.risk_level.as_str(),
        "Meal logged"
    );
    Ok(meal)
}
