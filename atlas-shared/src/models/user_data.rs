/// UserData model
///
/// Per-user profile record sitting between a Person and their AuthUser.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_data (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     person_id UUID NOT NULL UNIQUE REFERENCES person(id) ON DELETE CASCADE,
///     phone VARCHAR(255),
///     address TEXT,
///     city VARCHAR(255),
///     state VARCHAR(255),
///     zip_code VARCHAR(255),
///     country VARCHAR(255),
///     logins INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Additional per-user information
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserData {
    /// Unique record ID
    pub id: Uuid,

    /// The person this record describes (one-to-one)
    pub person_id: Uuid,

    /// Optional phone number
    pub phone: Option<String>,

    /// Optional street address
    pub address: Option<String>,

    /// Optional city
    pub city: Option<String>,

    /// Optional state/region
    pub state: Option<String>,

    /// Optional postal code
    pub zip_code: Option<String>,

    /// Optional country
    pub country: Option<String>,

    /// Number of logins recorded for this user
    pub logins: i32,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserData {
    /// Creates a user-data record for a person
    ///
    /// Runs on any executor so registration can include it in its transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        person_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let user_data = sqlx::query_as::<_, UserData>(
            r#"
            INSERT INTO user_data (person_id)
            VALUES ($1)
            RETURNING id, person_id, phone, address, city, state, zip_code, country,
                      logins, created_at, updated_at
            "#,
        )
        .bind(person_id)
        .fetch_one(executor)
        .await?;

        Ok(user_data)
    }

    /// Finds a record by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user_data = sqlx::query_as::<_, UserData>(
            r#"
            SELECT id, person_id, phone, address, city, state, zip_code, country,
                   logins, created_at, updated_at
            FROM user_data
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user_data)
    }

    /// Increments the login counter
    pub async fn increment_logins(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_data SET logins = logins + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
