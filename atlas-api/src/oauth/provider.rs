/// OAuth provider userinfo clients
///
/// Exchanges a caller-supplied access token for profile data at the
/// provider's userinfo endpoint. Single attempt, no retries: a provider
/// that answers non-200 means the token is bad, and a payload missing the
/// mandatory fields is rejected outright.
///
/// Mandatory fields per provider:
/// - **google**: subject id and email
/// - **facebook**: subject id (email is optional; Facebook accounts
///   registered with a phone number have none)

use serde_json::Value;

use super::OAuthError;

/// Supported OAuth providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    /// Provider name as stored in `oauth_account.provider`
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }

    /// Prefix for synthetic usernames when the provider returned no email
    pub fn handle_prefix(&self) -> &'static str {
        match self {
            Provider::Google => "g",
            Provider::Facebook => "fb",
        }
    }

    /// Builds the userinfo request URL for an access token
    fn userinfo_request_url(&self, base_url: &str, access_token: &str) -> String {
        match self {
            Provider::Google => format!("{}?access_token={}", base_url, access_token),
            Provider::Facebook => format!(
                "{}?fields=id,name,email,first_name,last_name&access_token={}",
                base_url, access_token
            ),
        }
    }
}

/// Profile data extracted from a provider userinfo payload
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Provider-assigned subject id
    pub provider_id: String,

    /// Email, when the provider reported one
    pub email: Option<String>,

    /// First/given name (may be empty)
    pub first_name: String,

    /// Last/family name (may be empty)
    pub last_name: String,

    /// The raw payload, stored verbatim on the OAuthAccount
    pub raw: Value,
}

/// Fetches and validates a provider profile for an access token
///
/// # Errors
///
/// - `Upstream` when the request itself fails (network, TLS)
/// - `InvalidProviderToken` when the provider answers non-200
/// - `InvalidProviderData` when mandatory profile fields are missing
pub async fn fetch_profile(
    client: &reqwest::Client,
    provider: Provider,
    userinfo_url: &str,
    access_token: &str,
) -> Result<ProviderProfile, OAuthError> {
    let url = provider.userinfo_request_url(userinfo_url, access_token);

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(OAuthError::InvalidProviderToken);
    }

    let payload: Value = response.json().await?;

    parse_profile(provider, payload)
}

/// Validates a userinfo payload and extracts the profile fields
pub fn parse_profile(provider: Provider, payload: Value) -> Result<ProviderProfile, OAuthError> {
    let provider_id = payload
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(OAuthError::InvalidProviderData(provider.name()))?
        .to_string();

    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .filter(|email| !email.is_empty())
        .map(str::to_string);

    // Google always reports an email; a payload without one is malformed.
    if provider == Provider::Google && email.is_none() {
        return Err(OAuthError::InvalidProviderData(provider.name()));
    }

    let (first_key, last_key) = match provider {
        Provider::Google => ("given_name", "family_name"),
        Provider::Facebook => ("first_name", "last_name"),
    };

    let first_name = payload
        .get(first_key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let last_name = payload
        .get(last_key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ProviderProfile {
        provider_id,
        email,
        first_name,
        last_name,
        raw: payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_google_profile() {
        let payload = json!({
            "id": "108234",
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "given_name": "Ada",
            "family_name": "Lovelace"
        });

        let profile = parse_profile(Provider::Google, payload).unwrap();
        assert_eq!(profile.provider_id, "108234");
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
    }

    #[test]
    fn test_google_profile_requires_email() {
        let payload = json!({ "id": "108234", "given_name": "Ada" });
        assert!(matches!(
            parse_profile(Provider::Google, payload),
            Err(OAuthError::InvalidProviderData("google"))
        ));
    }

    #[test]
    fn test_facebook_profile_email_is_optional() {
        let payload = json!({
            "id": "555",
            "name": "Ada Lovelace",
            "first_name": "Ada",
            "last_name": "Lovelace"
        });

        let profile = parse_profile(Provider::Facebook, payload).unwrap();
        assert_eq!(profile.provider_id, "555");
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_profile_requires_subject_id() {
        let payload = json!({ "email": "x@example.com" });
        assert!(parse_profile(Provider::Facebook, payload).is_err());

        let payload = json!({ "id": "", "email": "x@example.com" });
        assert!(parse_profile(Provider::Facebook, payload).is_err());
    }

    #[test]
    fn test_raw_payload_is_kept_verbatim() {
        let payload = json!({ "id": "1", "email": "x@example.com", "locale": "en_GB" });
        let profile = parse_profile(Provider::Google, payload.clone()).unwrap();
        assert_eq!(profile.raw, payload);
    }

    #[test]
    fn test_userinfo_request_urls() {
        let url = Provider::Google.userinfo_request_url("https://g.example/userinfo", "tok");
        assert_eq!(url, "https://g.example/userinfo?access_token=tok");

        let url = Provider::Facebook.userinfo_request_url("https://fb.example/me", "tok");
        assert!(url.starts_with("https://fb.example/me?fields=id,name,email,"));
        assert!(url.ends_with("access_token=tok"));
    }
}
