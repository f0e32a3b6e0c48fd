/// City reference data
///
/// Read-only lookup table used by location search. Populated out-of-band
/// from a geonames-style dataset.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE city (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     ascii_name VARCHAR(255) NOT NULL,
///     country VARCHAR(255) NOT NULL,
///     latitude DOUBLE PRECISION,
///     longitude DOUBLE PRECISION,
///     population INTEGER
/// );
/// CREATE INDEX ON city (ascii_name);
/// CREATE INDEX ON city (population DESC);
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum number of rows returned by a city search
pub const SEARCH_LIMIT: i64 = 10;

/// A city from the reference dataset
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    /// Unique city ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// ASCII-folded name used for searching
    pub ascii_name: String,

    /// Country name
    pub country: String,

    /// Optional latitude
    pub latitude: Option<f64>,

    /// Optional longitude
    pub longitude: Option<f64>,

    /// Optional population, used for result ranking
    pub population: Option<i32>,
}

/// A city search hit (the subset of fields the frontend lists)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CitySearchResult {
    /// City ID
    pub id: Uuid,

    /// ASCII-folded name
    pub ascii_name: String,

    /// Country name
    pub country: String,
}

impl City {
    /// Case-insensitive substring search on `ascii_name`
    ///
    /// Results are ordered by descending population (unknown populations
    /// last) and capped at [`SEARCH_LIMIT`].
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<CitySearchResult>, sqlx::Error> {
        let pattern = format!("%{}%", term);

        let results = sqlx::query_as::<_, CitySearchResult>(
            r#"
            SELECT id, ascii_name, country
            FROM city
            WHERE ascii_name ILIKE $1
            ORDER BY population DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(results)
    }

    /// Fetches a city's coordinates by ID
    ///
    /// Returns `None` when the city is unknown or has no coordinates on file.
    pub async fn coordinates(pool: &PgPool, id: Uuid) -> Result<Option<(f64, f64)>, sqlx::Error> {
        let row: Option<(Option<f64>, Option<f64>)> =
            sqlx::query_as("SELECT latitude, longitude FROM city WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(match row {
            Some((Some(lat), Some(lon))) => Some((lat, lon)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_shape() {
        let hit = CitySearchResult {
            id: Uuid::new_v4(),
            ascii_name: "Berlin".to_string(),
            country: "Germany".to_string(),
        };

        let value = serde_json::to_value(&hit).unwrap();
        assert!(value["id"].is_string());
        assert_eq!(value["ascii_name"], "Berlin");
        assert_eq!(value["country"], "Germany");
    }
}
