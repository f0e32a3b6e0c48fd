/// Office model
///
/// An office belongs to one company. At most one office per company should be
/// marked as headquarters; the store does not enforce this, it is an
/// application-level invariant.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE office (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES company(id) ON DELETE CASCADE,
///     name VARCHAR(255),
///     address TEXT,
///     city VARCHAR(255),
///     state VARCHAR(255),
///     zip VARCHAR(255),
///     country VARCHAR(255),
///     latitude DOUBLE PRECISION,
///     longitude DOUBLE PRECISION,
///     is_headquarters BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A company office
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Office {
    /// Unique office ID
    pub id: Uuid,

    /// Owning company
    pub company_id: Uuid,

    /// Optional office name
    pub name: Option<String>,

    /// Optional street address
    pub address: Option<String>,

    /// Optional city
    pub city: Option<String>,

    /// Optional state/region
    pub state: Option<String>,

    /// Optional postal code
    pub zip: Option<String>,

    /// Optional country
    pub country: Option<String>,

    /// Optional latitude
    pub latitude: Option<f64>,

    /// Optional longitude
    pub longitude: Option<f64>,

    /// Whether this office is the company headquarters
    pub is_headquarters: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Office {
    /// Lists a company's offices, headquarters last (matches directory ordering)
    pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let offices = sqlx::query_as::<_, Office>(
            r#"
            SELECT id, company_id, name, address, city, state, zip, country,
                   latitude, longitude, is_headquarters, created_at, updated_at
            FROM office
            WHERE company_id = $1
            ORDER BY is_headquarters, city
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(offices)
    }

    /// Finds a company's first office, if it has one
    pub async fn first_for_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let office = sqlx::query_as::<_, Office>(
            r#"
            SELECT id, company_id, name, address, city, state, zip, country,
                   latitude, longitude, is_headquarters, created_at, updated_at
            FROM office
            WHERE company_id = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .fetch_optional(pool)
        .await?;

        Ok(office)
    }

    /// Overwrites an office's coordinates
    ///
    /// Only used by the random-coordinates maintenance operation.
    pub async fn set_coordinates(
        pool: &PgPool,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE office SET latitude = $2, longitude = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Coordinates as a (lat, lon) pair when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office(lat: Option<f64>, lon: Option<f64>) -> Office {
        Office {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            country: None,
            latitude: lat,
            longitude: lon,
            is_headquarters: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_coordinates_require_both_fields() {
        assert_eq!(office(Some(1.5), Some(2.5)).coordinates(), Some((1.5, 2.5)));
        assert_eq!(office(Some(1.5), None).coordinates(), None);
        assert_eq!(office(None, Some(2.5)).coordinates(), None);
        assert_eq!(office(None, None).coordinates(), None);
    }
}
