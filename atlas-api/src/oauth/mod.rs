/// OAuth account linker
///
/// Turns a provider access token into a local session. The linker verifies
/// the token against the provider's userinfo endpoint, then resolves it to
/// a local account in three stages:
///
/// 1. a matching `(provider, provider_id)` link logs into the linked account
/// 2. otherwise a matching email links the provider to that existing account
/// 3. otherwise a fresh OAuth-only account is provisioned (no local password)
///
/// Stage 3 runs inside one transaction and retries through the store's
/// unique constraints, so concurrent first logins with the same provider
/// identity converge on a single account.

pub mod provider;

use sqlx::PgPool;
use tracing::info;

use atlas_shared::auth::session;
use atlas_shared::models::{
    auth_user::{AuthUser, CreateAuthUser},
    oauth_account::OAuthAccount,
    person::{CreatePerson, Person},
    user_data::UserData,
    user_session::UserSession,
};

pub use provider::{fetch_profile, parse_profile, Provider, ProviderProfile};

/// Upper bound on username-collision retries during provisioning
const MAX_USERNAME_ATTEMPTS: u32 = 50;

/// Errors from the OAuth login flow
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// The provider rejected the access token
    #[error("Invalid access token")]
    InvalidProviderToken,

    /// The provider payload lacked mandatory fields
    #[error("Incomplete profile data from {0}")]
    InvalidProviderData(&'static str),

    /// The userinfo request itself failed
    #[error(transparent)]
    Upstream(#[from] reqwest::Error),

    /// Database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Outcome of an OAuth login
#[derive(Debug)]
pub struct OAuthLogin {
    /// The resolved or provisioned account
    pub user: AuthUser,

    /// Plaintext bearer token, handed out exactly once
    pub token: String,

    /// The stored session row
    pub session: UserSession,

    /// Whether a new account was provisioned for this login
    pub created: bool,
}

/// Logs a user in with a verified provider profile
///
/// Callers obtain the profile via [`fetch_profile`]; the split keeps the
/// linking logic independent of HTTP so it can be exercised directly.
pub async fn login(
    pool: &PgPool,
    provider: Provider,
    profile: ProviderProfile,
    access_token: &str,
) -> Result<OAuthLogin, OAuthError> {
    // Stage 1: known provider identity.
    if let Some(account) =
        OAuthAccount::find_by_provider_identity(pool, provider.name(), &profile.provider_id).await?
    {
        let user = AuthUser::find_by_id(pool, account.user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        OAuthAccount::upsert(
            pool,
            user.id,
            provider.name(),
            &profile.provider_id,
            access_token,
            &profile.raw,
        )
        .await?;

        return finish_login(pool, user, false).await;
    }

    // Stage 2: same email as an existing local account.
    if let Some(email) = &profile.email {
        if let Some(user) = AuthUser::find_by_email(pool, email).await? {
            OAuthAccount::upsert(
                pool,
                user.id,
                provider.name(),
                &profile.provider_id,
                access_token,
                &profile.raw,
            )
            .await?;

            info!(
                user_id = %user.id,
                provider = provider.name(),
                "Linked provider identity to existing account"
            );

            return finish_login(pool, user, false).await;
        }
    }

    // Stage 3: provision a fresh OAuth-only account.
    let user = provision(pool, provider, &profile, access_token).await?;
    finish_login(pool, user, true).await
}

/// Issues a session and bumps the login counters
async fn finish_login(
    pool: &PgPool,
    user: AuthUser,
    created: bool,
) -> Result<OAuthLogin, OAuthError> {
    let (token, session) = session::issue(pool, user.id).await?;

    AuthUser::update_last_login(pool, user.id).await?;
    UserData::increment_logins(pool, user.user_data_id).await?;

    Ok(OAuthLogin {
        user,
        token,
        session,
        created,
    })
}

/// Creates an OAuth-only account for a provider profile
///
/// The whole identity chain (Person, UserData, AuthUser, provider link) is
/// created in one transaction. `password_hash` stays NULL; the account can
/// only ever log in through a provider.
///
/// A lost race against a concurrent first login surfaces as a unique
/// violation on the provider link or the email; both resolve by re-reading
/// the winner's row and logging into it.
async fn provision(
    pool: &PgPool,
    provider: Provider,
    profile: &ProviderProfile,
    access_token: &str,
) -> Result<AuthUser, OAuthError> {
    let email = profile
        .email
        .clone()
        .unwrap_or_else(|| format!("{}@{}.local", profile.provider_id, provider.name()));

    let username = unique_username(pool, provider, profile).await?;

    let mut tx = pool.begin().await.map_err(OAuthError::Database)?;

    let result = async {
        let person = Person::create(
            &mut *tx,
            CreatePerson {
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                email: email.clone(),
                company_id: None,
            },
        )
        .await?;
        let user_data = UserData::create(&mut *tx, person.id).await?;
        let user = AuthUser::create(
            &mut *tx,
            CreateAuthUser {
                user_data_id: user_data.id,
                username,
                email,
                password_hash: None,
            },
        )
        .await?;

        OAuthAccount::upsert(
            &mut *tx,
            user.id,
            provider.name(),
            &profile.provider_id,
            access_token,
            &profile.raw,
        )
        .await?;

        Ok::<_, sqlx::Error>(user)
    }
    .await;

    match result {
        Ok(user) => {
            tx.commit().await.map_err(OAuthError::Database)?;
            info!(
                user_id = %user.id,
                username = %user.username,
                provider = provider.name(),
                "Provisioned account from provider profile"
            );
            Ok(user)
        }
        Err(err) if is_unique_violation(&err) => {
            tx.rollback().await.ok();
            // A concurrent login won the race; log into its account.
            if let Some(account) = OAuthAccount::find_by_provider_identity(
                pool,
                provider.name(),
                &profile.provider_id,
            )
            .await?
            {
                return AuthUser::find_by_id(pool, account.user_id)
                    .await?
                    .ok_or(OAuthError::Database(sqlx::Error::RowNotFound));
            }
            if let Some(email) = &profile.email {
                if let Some(user) = AuthUser::find_by_email(pool, email).await? {
                    return Ok(user);
                }
            }
            Err(OAuthError::Database(err))
        }
        Err(err) => {
            tx.rollback().await.ok();
            Err(OAuthError::Database(err))
        }
    }
}

/// Picks an unused username for a provisioned account
///
/// Starts from the email local part (or a `{prefix}_{id}` handle when the
/// provider reported no email) and appends `_1`, `_2`, ... on collision.
async fn unique_username(
    pool: &PgPool,
    provider: Provider,
    profile: &ProviderProfile,
) -> Result<String, OAuthError> {
    let base = match &profile.email {
        Some(email) => email
            .split('@')
            .next()
            .unwrap_or(email.as_str())
            .to_string(),
        None => format!("{}_{}", provider.handle_prefix(), profile.provider_id),
    };

    if !AuthUser::username_exists(pool, &base).await? {
        return Ok(base);
    }

    for counter in 1..=MAX_USERNAME_ATTEMPTS {
        let candidate = format!("{}_{}", base, counter);
        if !AuthUser::username_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }

    // Past the retry bound, fall back to a collision-proof handle.
    Ok(format!("{}_{}", base, uuid::Uuid::new_v4().simple()))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::Google.name(), "google");
        assert_eq!(Provider::Facebook.name(), "facebook");
    }

    #[test]
    fn test_synthetic_email_shape() {
        // Facebook profiles without an email get a deterministic placeholder.
        let profile = parse_profile(Provider::Facebook, json!({ "id": "555" })).unwrap();
        let email = profile
            .email
            .clone()
            .unwrap_or_else(|| format!("{}@{}.local", profile.provider_id, "facebook"));
        assert_eq!(email, "555@facebook.local");
    }

    #[test]
    fn test_oauth_error_messages() {
        assert_eq!(OAuthError::InvalidProviderToken.to_string(), "Invalid access token");
        assert_eq!(
            OAuthError::InvalidProviderData("google").to_string(),
            "Incomplete profile data from google"
        );
    }
}
