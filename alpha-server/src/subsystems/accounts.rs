//! Accounts subsystem — signup, password login, bearer token resolution

use alpha_core::config::AuthConfig;
use alpha_core::models::User;
use alpha_core::validation::{normalize_email, require_non_empty};
use alpha_core::{security, AlphaError, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use super::join_error;
use crate::error::CREDENTIALS_DETAIL;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const BAD_LOGIN: &str = "Incorrect email or password";

pub async fn find_user_by_email<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, hashed_password, is_active, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;
    Ok(user)
}

/// Register a new account. Emails are unique after normalization.
pub async fn signup(
    pool: &PgPool,
    auth: &AuthConfig,
    email: &str,
    password: &str,
) -> Result<User> {
    let email = normalize_email(email)?;
    require_non_empty("password", password)?;
    let password = password.to_string();

    if find_user_by_email(pool, &email).await?.is_some() {
        return Err(AlphaError::Conflict("Email already registered".to_string()));
    }

    let iterations = auth.password_iterations;
    let hashed = tokio::task::spawn_blocking(move || security::hash_password(&password, iterations))
        .await
        .map_err(join_error)?;

    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, hashed_password)
        VALUES ($1, $2)
        RETURNING id, email, hashed_password, is_active, created_at
        "#,
    )
    .bind(&email)
    .bind(&hashed)
    .fetch_one(pool)
    .await;

    let user = match inserted {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            return Err(AlphaError::Conflict("Email already registered".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "User signed up");
    Ok(user)
}

/// Check a username/password pair and issue a bearer token.
pub async fn login(
    pool: &PgPool,
    auth: &AuthConfig,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let email = username.trim().to_lowercase();
    let user = match find_user_by_email(pool, &email).await? {
        Some(u) => u,
        None => return Err(AlphaError::Unauthorized(BAD_LOGIN.to_string())),
    };

    let candidate = password.to_string();
    let stored = user.hashed_password.clone();
    let valid = tokio::task::spawn_blocking(move || security::verify_password(&candidate, &stored))
        .await
        .map_err(join_error)?;

    if !valid {
        tracing::debug!(user_id = %user.id, "Rejected login with bad password");
        return Err(AlphaError::Unauthorized(BAD_LOGIN.to_string()));
    }
    if !user.is_active {
        return Err(AlphaError::Unauthorized("Inactive user".to_string()));
    }

    let token = security::create_access_token(&user.email, auth, now)?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(token)
}

/// Resolve a bearer token to its (active) user.
pub async fn resolve_bearer(pool: &PgPool, auth: &AuthConfig, token: &str) -> Result<User> {
    let email = security::decode_access_token(token, auth)?;
    match find_user_by_email(pool, &email).await? {
        Some(user) if user.is_active => Ok(user),
        _ => Err(AlphaError::Unauthorized(CREDENTIALS_DETAIL.to_string())),
    }
}
