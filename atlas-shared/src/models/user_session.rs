/// UserSession model
///
/// Token-backed sessions. Only the SHA-256 digest of a bearer token is
/// stored; the plaintext is returned to the client once at issuance and is
/// unrecoverable afterwards. A user may hold any number of concurrent
/// sessions. Expired rows are left in place and filtered at lookup time.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_session (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES custom_auth_user(id) ON DELETE CASCADE,
///     token_hash VARCHAR(255) NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     last_used_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE INDEX ON user_session (token_hash);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// A stored session row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSession {
    /// Unique session ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hex digest of the bearer token (never the plaintext)
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the session stops resolving
    pub expires_at: DateTime<Utc>,

    /// Last-used timestamp (storage-maintained, not touched by resolution)
    pub last_used_at: DateTime<Utc>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserSession {
    /// Inserts a session row
    ///
    /// Runs on any executor so registration can issue the initial session
    /// inside its transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, UserSession>(
            r#"
            INSERT INTO user_session (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, last_used_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;

        Ok(session)
    }

    /// Finds a session by token digest
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, UserSession>(
            r#"
            SELECT id, user_id, token_hash, expires_at, last_used_at, created_at, updated_at
            FROM user_session
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes the session matching a token digest
    ///
    /// Returns false when no row matched (reported to the client as an
    /// invalid token rather than silently ignored).
    pub async fn delete_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_session WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the session is past its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
