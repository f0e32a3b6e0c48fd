/// Company endpoints
///
/// Serves the authenticated user's company world: the union of every
/// UserWorld row's direct company and its denormalized company id array.
///
/// # Endpoints
///
/// - `GET /companies/user-companies/` - Companies in the user's world
/// - `POST /companies/random-coordinates/` - Scatter office coordinates
///   (test-data utility)

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{extract::State, Extension, Json};
use atlas_shared::models::{
    company::Company, office::Office, person::Person, taxonomy::Taxonomy, user_world::UserWorld,
};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

/// A company with its directory context
#[derive(Debug, Serialize)]
pub struct CompanyView {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub domains: serde_json::Value,
    pub description: Option<String>,

    /// The company's offices with display-ready coordinates
    pub offices: Vec<OfficeView>,

    /// Ids of people attached to the company
    pub people: Vec<Uuid>,

    /// Ids of the company's taxonomies
    pub taxonomies: Vec<Uuid>,
}

/// Office shape for map display
///
/// Coordinates default to `(0.0, 0.0)` when the office has none so the
/// frontend never sees nulls.
#[derive(Debug, Serialize)]
pub struct OfficeView {
    pub id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_headquarters: bool,
}

/// Random coordinates response
#[derive(Debug, Serialize)]
pub struct RandomCoordinatesResponse {
    pub message: String,
    pub updated: usize,
}

impl OfficeView {
    fn from_office(office: Office) -> Self {
        let (latitude, longitude) = office.coordinates().unwrap_or((0.0, 0.0));
        Self {
            id: office.id.to_string(),
            name: office.name,
            city: office.city,
            country: office.country,
            latitude,
            longitude,
            is_headquarters: office.is_headquarters,
        }
    }
}

/// User companies handler
///
/// Collects company ids across all of the user's worlds, fetches the
/// companies ordered by name, and serializes each with its offices, person
/// ids, and taxonomy ids. Dangling ids in the denormalized arrays are
/// silently skipped by the id lookup.
pub async fn user_companies(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<CompanyView>>> {
    let worlds = UserWorld::list_by_user(&state.db, user.id).await?;
    let company_ids = UserWorld::collect_company_ids(&worlds);

    let companies = Company::find_by_ids(&state.db, &company_ids).await?;

    let mut views = Vec::with_capacity(companies.len());
    for company in companies {
        let offices = Office::list_by_company(&state.db, company.id)
            .await?
            .into_iter()
            .map(OfficeView::from_office)
            .collect();

        let people = Person::ids_by_company(&state.db, company.id).await?;
        let taxonomies = Taxonomy::ids_by_company(&state.db, company.id).await?;

        views.push(CompanyView {
            id: company.id.to_string(),
            name: company.name,
            domain: company.domain,
            domains: company.domains,
            description: company.description,
            offices,
            people,
            taxonomies,
        });
    }

    Ok(Json(views))
}

/// Random coordinates handler
///
/// For every company, overwrites its first office's coordinates with a
/// uniform random point. Companies without offices are skipped.
pub async fn random_coordinates(
    State(state): State<AppState>,
) -> ApiResult<Json<RandomCoordinatesResponse>> {
    let company_ids = Company::all_ids(&state.db).await?;

    let mut updated = 0;
    for company_id in company_ids {
        let Some(office) = Office::first_for_company(&state.db, company_id).await? else {
            continue;
        };

        let (latitude, longitude) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0))
        };

        if Office::set_coordinates(&state.db, office.id, latitude, longitude).await? {
            updated += 1;
        }
    }

    Ok(Json(RandomCoordinatesResponse {
        message: format!("Assigned random coordinates to {} offices", updated),
        updated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn office(latitude: Option<f64>, longitude: Option<f64>) -> Office {
        Office {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: Some("HQ".to_string()),
            address: None,
            city: Some("London".to_string()),
            state: None,
            zip: None,
            country: Some("GB".to_string()),
            latitude,
            longitude,
            is_headquarters: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_office_view_defaults_missing_coordinates_to_origin() {
        let view = OfficeView::from_office(office(None, None));
        assert_eq!(view.latitude, 0.0);
        assert_eq!(view.longitude, 0.0);
    }

    #[test]
    fn test_office_view_keeps_real_coordinates() {
        let view = OfficeView::from_office(office(Some(51.5), Some(-0.1)));
        assert_eq!(view.latitude, 51.5);
        assert_eq!(view.longitude, -0.1);
    }
}
