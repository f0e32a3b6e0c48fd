/// OAuth endpoints
///
/// Providers hand the frontend an access token; these endpoints trade it
/// for a local session. The heavy lifting (verification, account linking,
/// provisioning) lives in `crate::oauth`.
///
/// # Endpoints
///
/// - `POST /oauth/google/` - Exchange a Google access token for a session
/// - `POST /oauth/facebook/` - Exchange a Facebook access token
/// - `GET /oauth/urls/` - Client ids and redirect URIs for the frontend

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    oauth::{self, Provider},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Provider login request
#[derive(Debug, Deserialize)]
pub struct ProviderLoginRequest {
    /// Access token obtained by the frontend from the provider
    pub access_token: String,
}

/// Provider login response
#[derive(Debug, Serialize)]
pub struct ProviderLoginResponse {
    /// Human-readable outcome
    pub message: String,

    /// The resolved or provisioned user
    pub user: OAuthUser,

    /// The issued session
    pub session: SessionInfo,
}

/// Session object embedded in provider login responses
///
/// The token is the plaintext bearer credential, shown exactly once.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// User object embedded in provider login responses
#[derive(Debug, Serialize)]
pub struct OAuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: chrono::DateTime<chrono::Utc>,
}

/// Frontend OAuth configuration response
///
/// Providers without a configured client id are omitted entirely.
#[derive(Debug, Serialize)]
pub struct OAuthUrlsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<ProviderUrls>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<ProviderUrls>,
}

/// Per-provider frontend configuration
#[derive(Debug, Serialize)]
pub struct ProviderUrls {
    pub client_id: String,
    pub redirect_uri: String,
}

/// Google login handler
pub async fn google_login(
    State(state): State<AppState>,
    Json(req): Json<ProviderLoginRequest>,
) -> ApiResult<Json<ProviderLoginResponse>> {
    provider_login(state, Provider::Google, req).await
}

/// Facebook login handler
pub async fn facebook_login(
    State(state): State<AppState>,
    Json(req): Json<ProviderLoginRequest>,
) -> ApiResult<Json<ProviderLoginResponse>> {
    provider_login(state, Provider::Facebook, req).await
}

/// Shared provider login flow
///
/// # Errors
///
/// - `400 Bad Request`: Missing access token, unconfigured provider,
///   rejected token, or incomplete provider profile
/// - `500 Internal Server Error`: Provider unreachable or database failure
async fn provider_login(
    state: AppState,
    provider: Provider,
    req: ProviderLoginRequest,
) -> ApiResult<Json<ProviderLoginResponse>> {
    if req.access_token.is_empty() {
        return Err(ApiError::BadRequest("access_token is required".to_string()));
    }

    let provider_config = match provider {
        Provider::Google => state.config.oauth.google.as_ref(),
        Provider::Facebook => state.config.oauth.facebook.as_ref(),
    }
    .ok_or_else(|| {
        ApiError::BadRequest(format!("{} login is not configured", provider.name()))
    })?;

    let profile = oauth::fetch_profile(
        &state.http,
        provider,
        &provider_config.userinfo_url,
        &req.access_token,
    )
    .await?;

    let login = oauth::login(&state.db, provider, profile, &req.access_token).await?;

    let full_name = login.user.full_name(&state.db).await?;

    let message = if login.created {
        "Account created and logged in".to_string()
    } else {
        "Login successful".to_string()
    };

    Ok(Json(ProviderLoginResponse {
        message,
        user: OAuthUser {
            id: login.user.id.to_string(),
            username: login.user.username,
            email: login.user.email,
            full_name,
            is_active: login.user.is_active,
            is_staff: login.user.is_staff,
            date_joined: login.user.date_joined,
        },
        session: SessionInfo {
            token: login.token,
            expires_at: login.session.expires_at,
        },
    }))
}

/// OAuth configuration handler
///
/// Hands the frontend the client ids and redirect URIs it needs to start
/// the provider flows.
pub async fn oauth_urls(State(state): State<AppState>) -> ApiResult<Json<OAuthUrlsResponse>> {
    let urls = |provider: Provider, config: &crate::config::ProviderConfig| ProviderUrls {
        client_id: config.client_id.clone(),
        redirect_uri: format!("{}/oauth/{}/callback", state.config.frontend_url, provider.name()),
    };

    Ok(Json(OAuthUrlsResponse {
        google: state
            .config
            .oauth
            .google
            .as_ref()
            .map(|c| urls(Provider::Google, c)),
        facebook: state
            .config
            .oauth
            .facebook
            .as_ref()
            .map(|c| urls(Provider::Facebook, c)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    #[test]
    fn test_unconfigured_providers_are_omitted() {
        let response = OAuthUrlsResponse {
            google: Some(ProviderUrls {
                client_id: "cid".to_string(),
                redirect_uri: "http://localhost:3000/oauth/google/callback".to_string(),
            }),
            facebook: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("facebook").is_none());
        assert_eq!(value["google"]["client_id"], "cid");
    }

    #[test]
    fn test_login_response_nests_token_under_session() {
        let response = ProviderLoginResponse {
            message: "Login successful".to_string(),
            user: OAuthUser {
                id: "00000000-0000-0000-0000-000000000001".to_string(),
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Lovelace".to_string(),
                is_active: true,
                is_staff: false,
                date_joined: Utc::now(),
            },
            session: SessionInfo {
                token: "tok".to_string(),
                expires_at: Utc::now(),
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["session"]["token"], "tok");
        assert!(value["session"]["expires_at"].is_string());
        assert!(value.get("token").is_none());
        assert_eq!(value["user"]["is_active"], true);
        assert_eq!(value["user"]["is_staff"], false);
        assert!(value["user"]["date_joined"].is_string());
    }
}
