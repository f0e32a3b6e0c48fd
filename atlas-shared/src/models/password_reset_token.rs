/// PasswordResetToken model
///
/// Reset tokens are modeled for schema fidelity (the table exists and is
/// visible in the admin surface) but no handler currently issues or
/// consumes one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE password_reset_token (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES custom_auth_user(id) ON DELETE CASCADE,
///     token_hash VARCHAR(255) NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     used BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A password reset token row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PasswordResetToken {
    /// Unique token ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hex digest of the reset token
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the token stops being redeemable
    pub expires_at: DateTime<Utc>,

    /// Whether the token has already been redeemed
    pub used: bool,

    /// When the token was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Lists a user's reset tokens, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tokens = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, user_id, token_hash, expires_at, used, created_at, updated_at
            FROM password_reset_token
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tokens)
    }

    /// A token is spent when it is past expiry or already redeemed
    pub fn is_spent(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at || self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_spent() {
        let now = Utc::now();
        let mut token = PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "h".repeat(64),
            expires_at: now + Duration::hours(1),
            used: false,
            created_at: now,
            updated_at: now,
        };

        assert!(!token.is_spent(now));

        token.used = true;
        assert!(token.is_spent(now));

        token.used = false;
        token.expires_at = now - Duration::hours(1);
        assert!(token.is_spent(now));
    }
}
