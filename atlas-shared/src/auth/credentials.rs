/// Credential manager
///
/// Registration and username/password authentication.
///
/// Registration creates the full identity chain (Person → UserData →
/// AuthUser) and issues the initial session in one transaction, so a
/// partial identity is never visible. The duplicate pre-checks are a UX
/// fast path only; the store's unique constraints are the authoritative
/// guard and their violations map to the same conflict errors.

use sqlx::PgPool;
use tracing::info;

use super::{password, session};
use crate::models::{
    auth_user::{AuthUser, CreateAuthUser},
    person::{CreatePerson, Person},
    user_data::UserData,
    user_session::UserSession,
};

/// Errors from registration and authentication
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// A required field was empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Username already registered
    #[error("Username already exists")]
    UsernameTaken,

    /// Email already registered
    #[error("Email already exists")]
    EmailTaken,

    /// No match, wrong password, or no local credential
    ///
    /// Deliberately a single constant shape: the caller can never tell
    /// which of the three checks failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The matched account is deactivated
    #[error("Account is deactivated")]
    AccountDisabled,

    /// Password hashing failure
    #[error(transparent)]
    Password(#[from] password::PasswordError),

    /// Database failure
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for CredentialError {
    fn from(err: sqlx::Error) -> Self {
        // Unique violations from the store are the authoritative duplicate
        // signal; translate them to the same errors the pre-checks produce.
        if let sqlx::Error::Database(ref db_err) = err {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("username") {
                    return CredentialError::UsernameTaken;
                }
                if constraint.contains("email") {
                    return CredentialError::EmailTaken;
                }
            }
        }
        CredentialError::Database(err)
    }
}

/// Input for registering a new user
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewRegistration {
    fn validate(&self) -> Result<(), CredentialError> {
        if self.username.trim().is_empty() {
            return Err(CredentialError::MissingField("username"));
        }
        if self.email.trim().is_empty() {
            return Err(CredentialError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(CredentialError::MissingField("password"));
        }
        Ok(())
    }
}

/// Registers a new user and issues their first session
///
/// Returns the created user, the plaintext bearer token (handed out exactly
/// once), and the stored session row.
pub async fn register(
    pool: &PgPool,
    registration: NewRegistration,
) -> Result<(AuthUser, String, UserSession), CredentialError> {
    registration.validate()?;

    // Fast-path duplicate hints; the unique constraints still guard the insert.
    if AuthUser::username_exists(pool, &registration.username).await? {
        return Err(CredentialError::UsernameTaken);
    }
    if AuthUser::email_exists(pool, &registration.email).await? {
        return Err(CredentialError::EmailTaken);
    }

    let password_hash = password::hash_password(&registration.password)?;

    let mut tx = pool.begin().await.map_err(CredentialError::Database)?;

    let person = Person::create(
        &mut *tx,
        CreatePerson {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email.clone(),
            company_id: None,
        },
    )
    .await?;

    let user_data = UserData::create(&mut *tx, person.id).await?;

    let user = AuthUser::create(
        &mut *tx,
        CreateAuthUser {
            user_data_id: user_data.id,
            username: registration.username,
            email: registration.email,
            password_hash: Some(password_hash),
        },
    )
    .await?;

    let (token, session) = session::issue(&mut *tx, user.id).await?;

    tx.commit().await.map_err(CredentialError::Database)?;

    info!(user_id = %user.id, username = %user.username, "Registered new user");

    Ok((user, token, session))
}

/// Authenticates a user by username or email plus password
///
/// The identifier is tried as a username first, then as an email. All
/// failure paths short of a disabled account collapse into
/// `InvalidCredentials` so a caller cannot probe which field was wrong.
/// Updates the last-login timestamp on success.
pub async fn authenticate(
    pool: &PgPool,
    identifier: &str,
    password_input: &str,
) -> Result<AuthUser, CredentialError> {
    if identifier.is_empty() {
        return Err(CredentialError::MissingField("username"));
    }
    if password_input.is_empty() {
        return Err(CredentialError::MissingField("password"));
    }

    let user = match AuthUser::find_by_username(pool, identifier).await? {
        Some(user) => user,
        None => AuthUser::find_by_email(pool, identifier)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?,
    };

    // OAuth-only accounts (no local credential) fail exactly like a wrong
    // password; never route a None hash through the verifier.
    let hash = user
        .password_hash
        .as_deref()
        .ok_or(CredentialError::InvalidCredentials)?;

    if !password::verify_password(password_input, hash)? {
        return Err(CredentialError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(CredentialError::AccountDisabled);
    }

    AuthUser::update_last_login(pool, user.id).await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> NewRegistration {
        NewRegistration {
            username: "bob".to_string(),
            email: "bob@x.com".to_string(),
            password: "pw123456".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Lee".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_registration() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_required_fields() {
        let mut r = registration();
        r.username = "  ".to_string();
        assert!(matches!(
            r.validate(),
            Err(CredentialError::MissingField("username"))
        ));

        let mut r = registration();
        r.email = String::new();
        assert!(matches!(
            r.validate(),
            Err(CredentialError::MissingField("email"))
        ));

        let mut r = registration();
        r.password = String::new();
        assert!(matches!(
            r.validate(),
            Err(CredentialError::MissingField("password"))
        ));
    }

    #[test]
    fn test_invalid_credentials_message_is_constant() {
        // The same message regardless of which check failed.
        assert_eq!(
            CredentialError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }
}
