/// OAuthAccount model
///
/// Links an AuthUser to a third-party provider identity. The
/// `(provider, provider_id)` pair is unique at the store; creation is an
/// upsert so concurrent logins with the same provider identity converge on
/// a single row instead of racing into duplicates.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE oauth_account (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES custom_auth_user(id) ON DELETE CASCADE,
///     provider VARCHAR(50) NOT NULL,
///     provider_id VARCHAR(100) NOT NULL,
///     access_token TEXT,
///     refresh_token TEXT,
///     expires_at TIMESTAMPTZ,
///     provider_data JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (provider, provider_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// A provider identity linked to a local account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OAuthAccount {
    /// Unique row ID
    pub id: Uuid,

    /// Linked local user
    pub user_id: Uuid,

    /// Provider name ("google", "facebook")
    pub provider: String,

    /// Provider-assigned subject ID
    pub provider_id: String,

    /// Latest access token from the provider
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// Latest refresh token from the provider, if any
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    /// Provider token expiry, if reported
    pub expires_at: Option<DateTime<Utc>>,

    /// Raw provider profile payload, overwritten on every login
    pub provider_data: serde_json::Value,

    /// When the link was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl OAuthAccount {
    /// Finds a link by provider identity
    pub async fn find_by_provider_identity(
        pool: &PgPool,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, OAuthAccount>(
            r#"
            SELECT id, user_id, provider, provider_id, access_token, refresh_token,
                   expires_at, provider_data, created_at, updated_at
            FROM oauth_account
            WHERE provider = $1 AND provider_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Creates or refreshes a provider link
    ///
    /// Upserts on `(provider, provider_id)`: a lost race against a concurrent
    /// login for the same provider identity updates the existing row rather
    /// than inserting a duplicate. The stored access token and raw payload
    /// are overwritten either way.
    pub async fn upsert<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        provider: &str,
        provider_id: &str,
        access_token: &str,
        provider_data: &serde_json::Value,
    ) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, OAuthAccount>(
            r#"
            INSERT INTO oauth_account (user_id, provider, provider_id, access_token, provider_data)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (provider, provider_id) DO UPDATE
            SET access_token = EXCLUDED.access_token,
                provider_data = EXCLUDED.provider_data,
                updated_at = NOW()
            RETURNING id, user_id, provider, provider_id, access_token, refresh_token,
                      expires_at, provider_data, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_id)
        .bind(access_token)
        .bind(provider_data)
        .fetch_one(executor)
        .await?;

        Ok(account)
    }

    /// Lists a user's provider links
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, OAuthAccount>(
            r#"
            SELECT id, user_id, provider, provider_id, access_token, refresh_token,
                   expires_at, provider_data, created_at, updated_at
            FROM oauth_account
            WHERE user_id = $1
            ORDER BY provider
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }
}
