/// Person model
///
/// A directory individual. Belongs to at most one company and optionally one
/// office. Created at registration or OAuth signup; never auto-deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE person (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(20),
///     address TEXT,
///     city VARCHAR(255),
///     state VARCHAR(255),
///     zip INTEGER,
///     country VARCHAR(255),
///     latitude DOUBLE PRECISION,
///     longitude DOUBLE PRECISION,
///     office_id UUID REFERENCES office(id) ON DELETE SET NULL,
///     company_id UUID REFERENCES company(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// A directory individual
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    /// Unique person ID
    pub id: Uuid,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address (unique across people)
    pub email: String,

    /// Optional phone number
    pub phone: Option<String>,

    /// Optional street address
    pub address: Option<String>,

    /// Optional city
    pub city: Option<String>,

    /// Optional state/region
    pub state: Option<String>,

    /// Optional postal code
    pub zip: Option<i32>,

    /// Optional country
    pub country: Option<String>,

    /// Optional latitude for mapping
    pub latitude: Option<f64>,

    /// Optional longitude for mapping
    pub longitude: Option<f64>,

    /// Office this person sits in, if any
    pub office_id: Option<Uuid>,

    /// Company this person belongs to, if any
    pub company_id: Option<Uuid>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new person
#[derive(Debug, Clone, Default)]
pub struct CreatePerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: Option<Uuid>,
}

impl Person {
    /// Creates a new person
    ///
    /// Takes any executor so callers can run this inside a transaction
    /// (registration creates Person, UserData, and AuthUser atomically).
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreatePerson,
    ) -> Result<Self, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO person (first_name, last_name, email, company_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, phone, address, city, state, zip,
                      country, latitude, longitude, office_id, company_id, created_at, updated_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.company_id)
        .fetch_one(executor)
        .await?;

        Ok(person)
    }

    /// Finds a person by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, first_name, last_name, email, phone, address, city, state, zip,
                   country, latitude, longitude, office_id, company_id, created_at, updated_at
            FROM person
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(person)
    }

    /// Lists the IDs of everyone belonging to a company
    pub async fn ids_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM person WHERE company_id = $1 ORDER BY last_name, first_name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let person = Person {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            country: None,
            latitude: None,
            longitude: None,
            office_id: None,
            company_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(person.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_create_person_defaults() {
        let data = CreatePerson {
            first_name: "Bob".to_string(),
            last_name: "Lee".to_string(),
            email: "bob@x.com".to_string(),
            ..Default::default()
        };

        assert!(data.company_id.is_none());
    }
}
