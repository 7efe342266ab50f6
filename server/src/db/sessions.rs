//! Session lookups for bearer tokens.

use chrono::Utc;
use sqlx::PgPool;

/// Resolve a bearer token to the user it was issued for.
///
/// Unknown and expired tokens resolve to `None`.
pub async fn find_session_user(pool: &PgPool, token: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM sessions WHERE token = $1 AND expires_at > $2")
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
}
