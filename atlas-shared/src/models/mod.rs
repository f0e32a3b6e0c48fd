/// Database models for the Atlas directory
///
/// One module per table. All tables are externally owned; each module
/// documents the layout it expects but nothing here issues migrations.
///
/// # Models
///
/// - `person`: directory individuals
/// - `company`: companies with domains and descriptions
/// - `office`: company offices with optional coordinates
/// - `taxonomy`: company categories and the company/taxonomy join rows
/// - `city`: read-only city reference data for location search
/// - `user_data`: per-user profile record sitting between Person and AuthUser
/// - `auth_user`: authenticable account
/// - `user_session`: hashed bearer-token sessions
/// - `password_reset_token`: reset tokens (modeled, no handler issues them)
/// - `oauth_account`: third-party provider identity links
/// - `user_world`: per-user company/people networks
///
/// # Example
///
/// ```no_run
/// use atlas_shared::models::auth_user::AuthUser;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// if let Some(user) = AuthUser::find_by_username(&pool, "alice").await? {
///     println!("{} joined {}", user.username, user.date_joined);
/// }
/// # Ok(())
/// # }
/// ```

pub mod auth_user;
pub mod city;
pub mod company;
pub mod oauth_account;
pub mod office;
pub mod password_reset_token;
pub mod person;
pub mod taxonomy;
pub mod user_data;
pub mod user_session;
pub mod user_world;
