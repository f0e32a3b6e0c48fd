/// Company model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE company (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     domain VARCHAR(255) NOT NULL UNIQUE,
///     domains JSONB NOT NULL DEFAULT '[]',
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A company in the directory
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID
    pub id: Uuid,

    /// Company name
    pub name: String,

    /// Primary domain (unique)
    pub domain: String,

    /// All known domains for the company, as a JSON list
    pub domains: serde_json::Value,

    /// Free-text description
    pub description: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, domain, domains, description, created_at, updated_at
            FROM company
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Fetches companies by a set of IDs, ordered by name
    ///
    /// Used by the user-companies view, where the id set is the union of a
    /// user's UserWorld company references. Unknown IDs are silently skipped
    /// (the denormalized arrays carry no referential-integrity guarantee).
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, domain, domains, description, created_at, updated_at
            FROM company
            WHERE id = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(companies)
    }

    /// Lists all company IDs, ordered for stable batch iteration
    pub async fn all_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM company ORDER BY id")
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_serializes_domains_as_list() {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            domain: "acme.com".to_string(),
            domains: serde_json::json!(["acme.com", "acme.io"]),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&company).unwrap();
        assert!(value["domains"].is_array());
        assert_eq!(value["domains"][1], "acme.io");
    }
}
