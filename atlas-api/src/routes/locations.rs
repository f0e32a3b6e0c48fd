/// Location endpoints
///
/// City search and coordinate lookups against the read-only city reference
/// table.
///
/// # Endpoints
///
/// - `GET /locations/search_locations/?search_term=<term>` - Top matches
/// - `GET /locations/coordinates/?location_id=<uuid>` - A city's coordinates

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Json,
};
use atlas_shared::models::city::{City, CitySearchResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search_term: Option<String>,
}

/// Coordinate query parameters
#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub location_id: Option<Uuid>,
}

/// Coordinate lookup response
#[derive(Debug, Serialize)]
pub struct CoordinatesResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// City search handler
///
/// Case-insensitive substring match on the ASCII city name, most populous
/// first, capped at ten results.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty `search_term`
pub async fn search_locations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<CitySearchResult>>> {
    let term = params
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("search_term is required".to_string()))?;

    let results = City::search(&state.db, term).await?;

    Ok(Json(results))
}

/// City coordinates handler
///
/// # Errors
///
/// - `400 Bad Request`: Missing `location_id`
/// - `404 Not Found`: Unknown city, or a city without coordinates
pub async fn coordinates(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> ApiResult<Json<CoordinatesResponse>> {
    let location_id = params
        .location_id
        .ok_or_else(|| ApiError::BadRequest("location_id is required".to_string()))?;

    let (latitude, longitude) = City::coordinates(&state.db, location_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;

    Ok(Json(CoordinatesResponse {
        latitude,
        longitude,
    }))
}
