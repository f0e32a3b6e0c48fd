/// API route handlers
///
/// Organized by resource:
/// - `auth`: registration, login, logout, profile
/// - `oauth`: provider logins and frontend OAuth configuration
/// - `companies`: the authenticated user's company world
/// - `locations`: city search and coordinate lookups
/// - `health`: liveness and database connectivity

pub mod auth;
pub mod companies;
pub mod health;
pub mod locations;
pub mod oauth;

use crate::error::{ApiError, ValidationErrorDetail};

/// Flattens validator output into the per-field error response shape
pub(crate) fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::Validation(errors)
}
