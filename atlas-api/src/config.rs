/// Configuration management for the API server
///
/// Loads configuration from environment variables into a typed struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `FRONTEND_URL`: base URL the OAuth redirect URIs point at
///   (default: http://localhost:3000)
/// - `GOOGLE_CLIENT_ID` / `FACEBOOK_CLIENT_ID`: OAuth client ids; a provider
///   without a client id is simply omitted from `/oauth/urls/`
/// - `GOOGLE_USERINFO_URL` / `FACEBOOK_USERINFO_URL`: override the provider
///   userinfo endpoints (used by tests; defaults are the real endpoints)
/// - `RUST_LOG`: log level (default: info)
///
/// # Example
///
/// ```no_run
/// use atlas_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Default Google userinfo endpoint
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Default Facebook userinfo endpoint
pub const FACEBOOK_USERINFO_URL: &str = "https://graph.facebook.com/me";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Base URL of the frontend, used to build OAuth redirect URIs
    pub frontend_url: String,

    /// OAuth provider configuration
    pub oauth: OAuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// OAuth provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Google provider settings, if configured
    pub google: Option<ProviderConfig>,

    /// Facebook provider settings, if configured
    pub facebook: Option<ProviderConfig>,
}

/// Settings for a single OAuth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth client id handed to the frontend
    pub client_id: String,

    /// Userinfo endpoint used to verify access tokens
    pub userinfo_url: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or numeric variables
    /// fail to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let google = env::var("GOOGLE_CLIENT_ID").ok().map(|client_id| ProviderConfig {
            client_id,
            userinfo_url: env::var("GOOGLE_USERINFO_URL")
                .unwrap_or_else(|_| GOOGLE_USERINFO_URL.to_string()),
        });

        let facebook = env::var("FACEBOOK_CLIENT_ID").ok().map(|client_id| ProviderConfig {
            client_id,
            userinfo_url: env::var("FACEBOOK_USERINFO_URL")
                .unwrap_or_else(|_| FACEBOOK_USERINFO_URL.to_string()),
        });

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            frontend_url,
            oauth: OAuthConfig { google, facebook },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/atlas".to_string(),
                max_connections: 10,
            },
            frontend_url: "http://localhost:3000".to_string(),
            oauth: OAuthConfig::default(),
        };

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_oauth_config_defaults_to_no_providers() {
        let oauth = OAuthConfig::default();
        assert!(oauth.google.is_none());
        assert!(oauth.facebook.is_none());
    }
}
