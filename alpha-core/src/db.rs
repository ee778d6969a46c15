use crate::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Advisory lock key held while the schema is applied.
const SCHEMA_LOCK_KEY: i64 = 0x6c_6974_616c_7068;

/// Idempotent bootstrap schema, applied in order at startup.
const SCHEMA: &[&str] = &[
    r#"
    DO $$ BEGIN
        CREATE TYPE risk_level AS ENUM ('safe', 'low', 'moderate', 'high');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dose_logs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS dose_logs_user_ts ON dose_logs (user_id, timestamp DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS meal_logs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        food_item TEXT NOT NULL,
        risk_level risk_level NOT NULL DEFAULT 'low',
        timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS meal_logs_user_ts ON meal_logs (user_id, timestamp DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS symptoms (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        severity INTEGER NOT NULL CHECK (severity BETWEEN 1 AND 10),
        description TEXT NOT NULL,
        meal_id UUID REFERENCES meal_logs(id) ON DELETE SET NULL,
        timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS symptoms_user_ts ON symptoms (user_id, timestamp DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS streaks (
        user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        current_count INTEGER NOT NULL DEFAULT 0,
        last_dose_date TIMESTAMPTZ
    )
    "#,
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

pub async fn health_check(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}

/// Create the tables the API relies on if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    // Concurrent bootstraps would race on the catalog otherwise
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(statements = SCHEMA.len(), "Database schema ensured");
    Ok(())
}
