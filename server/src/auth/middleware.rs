//! Bearer token extraction.
//!
//! Tokens are opaque strings issued by the identity service and resolved
//! through the `sessions` table.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::db;
use crate::error::AppError;
use crate::AppState;

/// The signed-in user, if any.
///
/// A request without an `Authorization` header, or with a token that is
/// unknown or expired, has no identity. A header that is not a bearer token
/// is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub Option<String>);

impl Identity {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Identity(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized)?;

        let user_id = db::find_session_user(&state.pool, token).await?;
        if user_id.is_none() {
            tracing::debug!("Unknown or expired session token");
        }

        Ok(Identity(user_id))
    }
}

/// A request that must carry an identity.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity(Some(user_id)) => Ok(AuthUser { user_id }),
            Identity(None) => Err(AppError::Unauthorized),
        }
    }
}
