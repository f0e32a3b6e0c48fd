/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Logout (token revocation)
/// - Profile
///
/// # Endpoints
///
/// - `POST /auth/register/` - Register new user, returns a bearer token
/// - `POST /auth/login/` - Login with username or email
/// - `POST /auth/logout/` - Revoke the presented bearer token
/// - `GET /auth/profile/` - Current user's profile

use crate::{
    app::{bearer_token, AppState, CurrentUser},
    error::{ApiError, ApiResult},
    routes::validation_error,
};
use axum::{extract::State, http::HeaderMap, http::StatusCode, Extension, Json};
use atlas_shared::{
    auth::{credentials, session},
    models::{auth_user::AuthUser, oauth_account::OAuthAccount},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique)
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// First name
    #[serde(default)]
    pub first_name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,
}

/// Login request
///
/// The `username` field also accepts an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User object embedded in auth responses
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User ID
    pub id: String,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Display name resolved via the linked person
    pub full_name: String,
}

/// Register/login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Human-readable outcome
    pub message: String,

    /// The authenticated user
    pub user: UserSummary,

    /// Bearer token for subsequent requests (shown exactly once)
    pub token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

/// Extended user object for the profile endpoint
#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub date_joined: chrono::DateTime<chrono::Utc>,

    /// Names of linked OAuth providers
    pub providers: Vec<String>,
}

impl UserSummary {
    async fn from_user(db: &sqlx::PgPool, user: &AuthUser) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name(db).await?,
        })
    }
}

/// Register a new user
///
/// Creates the person, profile, and account records, then issues the first
/// session token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register/
/// Content-Type: application/json
///
/// {
///   "username": "ada",
///   "email": "ada@example.com",
///   "password": "pw123456",
///   "first_name": "Ada",
///   "last_name": "Lovelace"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or username/email already exists
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(validation_error)?;

    let (user, token, _session) = credentials::register(
        &state.db,
        credentials::NewRegistration {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await?;

    let summary = UserSummary::from_user(&state.db, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: summary,
            token,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates by username or email plus password and issues a fresh
/// bearer token. Each login gets its own session; earlier tokens stay valid
/// until they expire or are revoked.
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields
/// - `401 Unauthorized`: Invalid credentials or deactivated account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = credentials::authenticate(&state.db, &req.username, &req.password).await?;

    let (token, _session) = session::issue(&state.db, user.id).await?;

    let summary = UserSummary::from_user(&state.db, &user).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: summary,
        token,
    }))
}

/// Logout endpoint
///
/// Revokes the presented bearer token. A token that matches no live session
/// answers 401; revocation of a valid token is permanent.
///
/// # Errors
///
/// - `400 Bad Request`: Authorization header is not a Bearer token
/// - `401 Unauthorized`: Missing header or unknown token
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<LogoutResponse>> {
    let token = bearer_token(&headers)?;

    if !session::revoke(&state.db, token).await? {
        return Err(ApiError::Unauthorized("Invalid token".to_string()));
    }

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Profile endpoint
///
/// Returns the authenticated user's profile, including linked OAuth
/// providers.
pub async fn profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let full_name = user.full_name(&state.db).await?;

    let providers = OAuthAccount::list_by_user(&state.db, user.id)
        .await?
        .into_iter()
        .map(|account| account.provider)
        .collect();

    Ok(Json(ProfileResponse {
        user: ProfileUser {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            full_name,
            is_active: user.is_active,
            date_joined: user.date_joined,
            providers,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: "ada".to_string(),
            email: "not-an-email".to_string(),
            password: "pw123456".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_names_are_optional() {
        // first_name/last_name default to empty strings when omitted.
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username": "ada", "email": "ada@example.com", "password": "pw123456"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.first_name, "");
    }

    #[test]
    fn test_auth_response_serialization() {
        let response = AuthResponse {
            message: "Login successful".to_string(),
            user: UserSummary {
                id: "00000000-0000-0000-0000-000000000001".to_string(),
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Lovelace".to_string(),
            },
            token: "tok".to_string(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user"]["full_name"], "Ada Lovelace");
        assert_eq!(value["token"], "tok");
    }
}
