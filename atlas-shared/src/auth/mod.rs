/// Authentication domain logic
///
/// - `password`: Argon2id hashing and verification
/// - `token`: opaque bearer-token generation and digesting
/// - `session`: session issue/resolve/revoke on top of `models::user_session`
/// - `credentials`: registration and username/email+password authentication

pub mod credentials;
pub mod password;
pub mod session;
pub mod token;
