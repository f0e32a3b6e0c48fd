/// Taxonomy models
///
/// Named company categories and the join rows linking them to companies.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE taxonomy (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE taxonomy_relationship (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES company(id) ON DELETE CASCADE,
///     taxonomy_id UUID NOT NULL REFERENCES taxonomy(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (company_id, taxonomy_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A named company category
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Taxonomy {
    /// Unique taxonomy ID
    pub id: Uuid,

    /// Category name (unique)
    pub name: String,

    /// Free-text description
    pub description: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Taxonomy {
    /// Finds a taxonomy by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let taxonomy = sqlx::query_as::<_, Taxonomy>(
            "SELECT id, name, description, created_at, updated_at FROM taxonomy WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(taxonomy)
    }

    /// Lists the taxonomy IDs associated with a company
    pub async fn ids_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT taxonomy_id FROM taxonomy_relationship WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
