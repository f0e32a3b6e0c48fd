/// UserWorld model
///
/// A user's curated network around one company: the direct company plus
/// denormalized arrays of related company/person IDs. The arrays are plain
/// identifier lists, not foreign keys; they are resolved by a second query
/// and carry no referential-integrity guarantee (eventually consistent).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_world (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES custom_auth_user(id) ON DELETE CASCADE,
///     company_id UUID NOT NULL REFERENCES company(id) ON DELETE CASCADE,
///     taxonomy_interests_id UUID REFERENCES taxonomy(id) ON DELETE SET NULL,
///     world_companies_id UUID[] NOT NULL DEFAULT '{}',
///     world_people_id UUID[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, company_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A user's world around one company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserWorld {
    /// Unique row ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// The world's primary company
    pub company_id: Uuid,

    /// Optional taxonomy the user flagged as an interest
    pub taxonomy_interests_id: Option<Uuid>,

    /// Related company IDs (identifier list, not foreign keys)
    pub world_companies_id: Vec<Uuid>,

    /// Related person IDs (identifier list, not foreign keys)
    pub world_people_id: Vec<Uuid>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserWorld {
    /// Lists a user's worlds
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let worlds = sqlx::query_as::<_, UserWorld>(
            r#"
            SELECT id, user_id, company_id, taxonomy_interests_id,
                   world_companies_id, world_people_id, created_at, updated_at
            FROM user_world
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(worlds)
    }

    /// Collects the distinct company IDs a set of worlds references
    ///
    /// Union of every world's direct `company_id` and its denormalized
    /// `world_companies_id` array, deduplicated and in stable order.
    pub fn collect_company_ids(worlds: &[UserWorld]) -> Vec<Uuid> {
        let mut ids = BTreeSet::new();
        for world in worlds {
            ids.insert(world.company_id);
            for id in &world.world_companies_id {
                ids.insert(*id);
            }
        }
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(company_id: Uuid, extras: Vec<Uuid>) -> UserWorld {
        UserWorld {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_id,
            taxonomy_interests_id: None,
            world_companies_id: extras,
            world_people_id: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_collect_company_ids_unions_and_dedupes() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        // b appears both as a direct company and inside an array
        let worlds = vec![world(a, vec![b, c]), world(b, vec![a])];

        let ids = UserWorld::collect_company_ids(&worlds);
        assert_eq!(ids.len(), 3);
        for id in [a, b, c] {
            assert!(ids.contains(&id));
        }
    }

    #[test]
    fn test_collect_company_ids_empty() {
        assert!(UserWorld::collect_company_ids(&[]).is_empty());
    }
}
