/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use atlas_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = atlas_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use atlas_shared::{auth::session, models::auth_user::AuthUser};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// HTTP client for provider userinfo requests
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// The authenticated user, added to request extensions by the session layer
///
/// Handlers behind the session layer extract it with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                               # Health check (public)
/// ├── /auth/
/// │   ├── POST /register/                   # Public
/// │   ├── POST /login/                      # Public
/// │   ├── POST /logout/                     # Session required
/// │   └── GET  /profile/                    # Session required
/// ├── /oauth/
/// │   ├── POST /google/                     # Public (token-for-session exchange)
/// │   ├── POST /facebook/                   # Public
/// │   └── GET  /urls/                       # Public
/// ├── /companies/
/// │   ├── GET  /user-companies/             # Session required
/// │   └── POST /random-coordinates/         # Public (test-data utility)
/// └── /locations/                           # Public
///     ├── GET /search_locations/
///     └── GET /coordinates/
/// ```
///
/// Trailing slashes are part of the paths; the frontend calls them that way.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth routes; logout reads the bearer itself because revocation
    // needs the raw token, not the resolved user
    let auth_public = Router::new()
        .route("/register/", post(routes::auth::register))
        .route("/login/", post(routes::auth::login))
        .route("/logout/", post(routes::auth::logout));

    // Session-holder auth routes
    let auth_protected = Router::new()
        .route("/profile/", get(routes::auth::profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // OAuth routes (public: they trade a provider token for a session)
    let oauth_routes = Router::new()
        .route("/google/", post(routes::oauth::google_login))
        .route("/facebook/", post(routes::oauth::facebook_login))
        .route("/urls/", get(routes::oauth::oauth_urls));

    // Company routes; only the user's world view needs a session, the
    // coordinate scatter is an unauthenticated test-data utility
    let company_routes = Router::new()
        .route("/user-companies/", get(routes::companies::user_companies))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ))
        .route(
            "/random-coordinates/",
            post(routes::companies::random_coordinates),
        );

    // Location lookups are public reference data
    let location_routes = Router::new()
        .route(
            "/search_locations/",
            get(routes::locations::search_locations),
        )
        .route("/coordinates/", get(routes::locations::coordinates));

    let cors = build_cors(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_public.merge(auth_protected))
        .nest("/oauth", oauth_routes)
        .nest("/companies", company_routes)
        .nest("/locations", location_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Configures CORS for the frontend origin
///
/// Falls back to permissive CORS when the configured frontend URL does not
/// parse as a header value (development setups).
fn build_cors(config: &Config) -> CorsLayer {
    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600)),
        Err(_) => CorsLayer::permissive(),
    }
}

/// Session authentication middleware layer
///
/// Resolves the bearer token from the Authorization header to its user and
/// injects `CurrentUser` into request extensions. Expired or unknown tokens
/// answer 401.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = bearer_token(req.headers())?;

    let user = session::resolve(&state.db, token)
        .await?
        .ok_or_else(|| crate::error::ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    if !user.is_active {
        return Err(crate::error::ApiError::Unauthorized(
            "Account is deactivated".to_string(),
        ));
    }

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Extracts the bearer token from an Authorization header
pub(crate) fn bearer_token(
    headers: &axum::http::HeaderMap,
) -> Result<&str, crate::error::ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::HeaderMap;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        assert!(matches!(
            bearer_token(&headers),
            Err(crate::error::ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_bearer_token_requires_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(crate::error::ApiError::Unauthorized(_))
        ));
    }
}
