//! Bearer-token authentication for protected routes.

use std::sync::Arc;

use alpha_core::models::User;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::http::HttpState;
use crate::subsystems::accounts;

/// The authenticated caller. Extracting it rejects the request with 401
/// unless a valid `Authorization: Bearer <token>` header names an active user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl FromRequestParts<Arc<HttpState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<HttpState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(ApiError::credentials)?;

        let user = accounts::resolve_bearer(&state.pool, &state.config.auth, token).await?;
        Ok(AuthUser(user))
    }
}
