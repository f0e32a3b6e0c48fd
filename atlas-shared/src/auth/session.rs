/// Session manager
///
/// Issues, resolves, and revokes opaque bearer-token sessions backed by
/// `models::user_session`. The plaintext token leaves this module exactly
/// once, at issuance; only its SHA-256 digest is stored, so a lost token is
/// unrecoverable by design.
///
/// Resolution is a pure read: it refreshes neither `expires_at` nor
/// `last_used_at`. Expired rows stay in storage (there is no sweeper) and
/// are filtered lazily here.

use chrono::{Duration, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::token::{generate_token, hash_token};
use crate::models::{auth_user::AuthUser, user_session::UserSession};

/// Fixed session lifetime from issuance
pub const SESSION_LIFETIME_DAYS: i64 = 30;

/// Issues a new session for a user
///
/// Returns the plaintext bearer token and the stored session row. The
/// plaintext is never persisted and cannot be retrieved again.
///
/// Takes any executor so registration can issue the initial session inside
/// its transaction.
pub async fn issue<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> Result<(String, UserSession), sqlx::Error> {
    let (token, token_hash) = generate_token();
    let expires_at = Utc::now() + Duration::days(SESSION_LIFETIME_DAYS);

    let session = UserSession::create(executor, user_id, &token_hash, expires_at).await?;

    Ok((token, session))
}

/// Resolves a bearer token to its user
///
/// Returns `None` when no session matches the token's digest, when the
/// session is past expiry, or when the linked user row is gone.
pub async fn resolve(pool: &PgPool, bearer_token: &str) -> Result<Option<AuthUser>, sqlx::Error> {
    let token_hash = hash_token(bearer_token);

    let session = match UserSession::find_by_token_hash(pool, &token_hash).await? {
        Some(session) => session,
        None => return Ok(None),
    };

    if session.is_expired(Utc::now()) {
        return Ok(None);
    }

    AuthUser::find_by_id(pool, session.user_id).await
}

/// Revokes the session matching a bearer token
///
/// Returns `false` when no session matched; callers report that as an
/// invalid-token client error rather than ignoring it.
pub async fn revoke(pool: &PgPool, bearer_token: &str) -> Result<bool, sqlx::Error> {
    let token_hash = hash_token(bearer_token);
    UserSession::delete_by_token_hash(pool, &token_hash).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifetime_is_thirty_days() {
        assert_eq!(SESSION_LIFETIME_DAYS, 30);
    }

    // issue/resolve/revoke round trips require a database; they are covered
    // by the testable properties asserted in the atlas-api suite where a
    // pool is available.
}
