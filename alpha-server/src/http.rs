//! Little Alpha HTTP REST API
//!
//! Axum-based HTTP server for dose, meal and symptom tracking.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to an
//! inner function taking the pool, config, caller and clock explicitly. The
//! inner functions are directly testable without axum dispatch machinery.
//!
//! Endpoints (under `/api`):
//! - GET  /health   — health check with DB status
//! - POST /signup   — create an account
//! - POST /login    — form login, returns a bearer token
//! - GET  /status   — protection status + streak
//! - POST /dose     — log a dose
//! - POST /meals    — log a meal
//! - POST /symptoms — log a symptom (auto-linked to a recent meal)
//! - GET  /history  — merged activity feed, newest first
//! - POST /waitlist — marketing waitlist signup

use std::sync::Arc;

use alpha_core::config::AuthConfig;
use alpha_core::models::{DoseEvent, MealEvent, RiskLevel, SymptomEvent, User};
use alpha_core::{AlphaConfig, HistoryEntry};
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiForm, ApiJson};
use crate::subsystems::doses::StatusReport;
use crate::subsystems::symptoms::NewSymptom;
use crate::subsystems::{accounts, doses, history, meals, symptoms, waitlist};

pub const SERVICE_NAME: &str = "Little Alpha";

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: PgPool,
    pub config: AlphaConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/status", get(status_handler))
        .route("/dose", post(dose_handler))
        .route("/meals", post(meal_handler))
        .route("/symptoms", post(symptom_handler))
        .route("/history", get(history_handler))
        .route("/waitlist", post(waitlist_handler));

    Router::new()
        .route("/", get(root_handler))
        .nest("/api", api)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    pool: PgPool,
    config: AlphaConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { pool, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Little Alpha API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2-style password form, as the web client posts it
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoseResponse {
    pub message: String,
    pub dose: DoseEvent,
    pub streak: i32,
}

#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub food_item: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

#[derive(Debug, Deserialize)]
pub struct SymptomRequest {
    pub severity: i32,
    pub description: String,
    pub meal_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health check — queries DB and returns (status_code, json_body).
pub async fn health_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    match alpha_core::db::health_check(pool).await {
        Ok(pg_ver) => (
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "postgresql": pg_ver,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "error": "Database unavailable",
                }),
            )
        }
    }
}

pub async fn signup_inner(
    pool: &PgPool,
    auth: &AuthConfig,
    req: SignupRequest,
) -> Result<UserResponse, ApiError> {
    let user = accounts::signup(pool, auth, &req.email, &req.password).await?;
    Ok(user.into())
}

pub async fn login_inner(
    pool: &PgPool,
    auth: &AuthConfig,
    form: LoginForm,
    now: DateTime<Utc>,
) -> Result<TokenResponse, ApiError> {
    let access_token = accounts::login(pool, auth, &form.username, &form.password, now).await?;
    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}

pub async fn status_inner(
    pool: &PgPool,
    user: &User,
    now: DateTime<Utc>,
) -> Result<StatusReport, ApiError> {
    Ok(doses::current_status(pool, user.id, now).await?)
}

pub async fn dose_inner(
    pool: &PgPool,
    user: &User,
    now: DateTime<Utc>,
) -> Result<DoseResponse, ApiError> {
    let (dose, streak) = doses::log_dose(pool, user.id, now).await?;
    Ok(DoseResponse {
        message: "Dose logged successfully".to_string(),
        dose,
        streak: streak.current_count,
    })
}

pub async fn meal_inner(
    pool: &PgPool,
    user: &User,
    req: MealRequest,
    now: DateTime<Utc>,
) -> Result<MealEvent, ApiError> {
    Ok(meals::log_meal(pool, user.id, &req.food_item, req.risk_level, now).await?)
}

pub async fn symptom_inner(
    pool: &PgPool,
    user: &User,
    req: SymptomRequest,
    now: DateTime<Utc>,
) -> Result<SymptomEvent, ApiError> {
    let new = NewSymptom {
        severity: req.severity,
        description: req.description,
        meal_id: req.meal_id,
    };
    Ok(symptoms::log_symptom(pool, user.id, new, now).await?)
}

pub async fn history_inner(pool: &PgPool, user: &User) -> Result<Vec<HistoryEntry>, ApiError> {
    Ok(history::fetch_history(pool, user.id).await?)
}

pub async fn waitlist_inner(
    csv_path: &str,
    req: WaitlistRequest,
    now: DateTime<Utc>,
) -> Result<serde_json::Value, ApiError> {
    let email = waitlist::join_waitlist(csv_path, &req.email, now).await?;
    Ok(serde_json::json!({
        "message": "You're on the waitlist!",
        "email": email,
    }))
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn signup_handler(
    State(state): State<Arc<HttpState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = signup_inner(&state.pool, &state.config.auth, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login_handler(
    State(state): State<Arc<HttpState>>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let token = login_inner(&state.pool, &state.config.auth, form, Utc::now()).await?;
    Ok(Json(token))
}

pub async fn status_handler(
    State(state): State<Arc<HttpState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let report = status_inner(&state.pool, &user, Utc::now()).await?;
    Ok(Json(report))
}

pub async fn dose_handler(
    State(state): State<Arc<HttpState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let resp = dose_inner(&state.pool, &user, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn meal_handler(
    State(state): State<Arc<HttpState>>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<MealRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let meal = meal_inner(&state.pool, &user, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn symptom_handler(
    State(state): State<Arc<HttpState>>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<SymptomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let symptom = symptom_inner(&state.pool, &user, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(symptom)))
}

pub async fn history_handler(
    State(state): State<Arc<HttpState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let feed = history_inner(&state.pool, &user).await?;
    Ok(Json(feed))
}

pub async fn waitlist_handler(
    State(state): State<Arc<HttpState>>,
    ApiJson(req): ApiJson<WaitlistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let body = waitlist_inner(&state.config.waitlist.csv_path, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

// ============================================================================
// Unit Tests — inner functions that need no database
// ============================================================================
