/// AuthUser model
///
/// The authenticable account entity. One-to-one with UserData (and
/// transitively Person). Owns its sessions and OAuth links via cascade
/// delete.
///
/// `password_hash` is nullable: `NULL` is the explicit "no local credential"
/// marker for OAuth-only accounts. Such accounts can never pass password
/// verification.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE custom_auth_user (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_data_id UUID NOT NULL UNIQUE REFERENCES user_data(id) ON DELETE CASCADE,
///     username VARCHAR(150) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_staff BOOLEAN NOT NULL DEFAULT FALSE,
///     is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
///     last_login TIMESTAMPTZ,
///     date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// An authenticable account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthUser {
    /// Unique user ID
    pub id: Uuid,

    /// Linked user-data record (one-to-one)
    pub user_data_id: Uuid,

    /// Username (unique)
    pub username: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2id password hash, or None for OAuth-only accounts
    ///
    /// Never store plaintext passwords. None means "no local credential";
    /// password login is impossible for such accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Whether the account may log in
    pub is_active: bool,

    /// Staff flag (admin surface)
    pub is_staff: bool,

    /// Superuser flag (admin surface)
    pub is_superuser: bool,

    /// When the user last logged in (None if never)
    pub last_login: Option<DateTime<Utc>>,

    /// When the account was created
    pub date_joined: DateTime<Utc>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new auth user
#[derive(Debug, Clone)]
pub struct CreateAuthUser {
    /// Linked user-data record
    pub user_data_id: Uuid,

    /// Username (must be unique)
    pub username: String,

    /// Email (must be unique)
    pub email: String,

    /// Argon2id hash, or None for OAuth-only accounts
    pub password_hash: Option<String>,
}

const COLUMNS: &str = "id, user_data_id, username, email, password_hash, is_active, \
                       is_staff, is_superuser, last_login, date_joined, created_at, updated_at";

impl AuthUser {
    /// Creates a new auth user
    ///
    /// The store's unique constraints on username and email are the
    /// authoritative uniqueness guard; violations surface as
    /// `sqlx::Error::Database` with code 23505.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateAuthUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, AuthUser>(&format!(
            r#"
            INSERT INTO custom_auth_user (user_data_id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(data.user_data_id)
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, AuthUser>(&format!(
            "SELECT {COLUMNS} FROM custom_auth_user WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, AuthUser>(&format!(
            "SELECT {COLUMNS} FROM custom_auth_user WHERE username = $1",
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, AuthUser>(&format!(
            "SELECT {COLUMNS} FROM custom_auth_user WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a username is taken
    ///
    /// A fast-path hint for registration and OAuth provisioning. The unique
    /// constraint remains the source of truth under concurrency.
    pub async fn username_exists<'e>(
        executor: impl PgExecutor<'e>,
        username: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM custom_auth_user WHERE username = $1)")
                .bind(username)
                .fetch_one(executor)
                .await?;

        Ok(row.0)
    }

    /// Checks whether an email is taken
    pub async fn email_exists<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM custom_auth_user WHERE email = $1)")
                .bind(email)
                .fetch_one(executor)
                .await?;

        Ok(row.0)
    }

    /// Updates the last-login timestamp after successful authentication
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE custom_auth_user SET last_login = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves the user's display name via their linked person
    ///
    /// Falls back to the username when the chain is incomplete.
    pub async fn full_name(&self, pool: &PgPool) -> Result<String, sqlx::Error> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT p.first_name, p.last_name
            FROM user_data ud
            JOIN person p ON p.id = ud.person_id
            WHERE ud.id = $1
            "#,
        )
        .bind(self.user_data_id)
        .fetch_optional(pool)
        .await?;

        Ok(match row {
            Some((first, last)) => format!("{} {}", first, last),
            None => self.username.clone(),
        })
    }

    /// Whether this account has a local password credential
    pub fn has_local_credential(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(password_hash: Option<String>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            user_data_id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            date_joined: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_oauth_only_account_has_no_local_credential() {
        assert!(!user(None).has_local_credential());
        assert!(user(Some("$argon2id$...".to_string())).has_local_credential());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let value = serde_json::to_value(user(Some("$argon2id$secret".to_string()))).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["username"], "alice");
    }
}
