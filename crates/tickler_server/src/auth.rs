//! Token-based authentication.
//!
//! Access tokens are short-lived HS256 JWTs whose subject is the user id.
//! Passwords are stored as Argon2id hashes. Protected handlers take an
//! [`AuthUser`] argument, which resolves the bearer token back to a live
//! account or rejects the request with 401.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tickler_db::{queries, UserRow};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per JWT convention.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: u64,
}

/// Issue an access token for a user id.
pub fn create_token(
    key: &EncodingKey,
    user_id: i64,
    expiry_minutes: u64,
) -> ServerResult<String> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| ServerError::Unauthorized)?
        .as_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + expiry_minutes * 60,
    };
    encode(&Header::new(Algorithm::HS256), &claims, key).map_err(|_| ServerError::Unauthorized)
}

/// Verify a token and return the user id it names.
pub fn verify_token(key: &DecodingKey, token: &str) -> ServerResult<i64> {
    let data = decode::<Claims>(token, key, &Validation::new(Algorithm::HS256))
        .map_err(|_| ServerError::Unauthorized)?;
    data.claims
        .sub
        .parse()
        .map_err(|_| ServerError::Unauthorized)
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> ServerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServerError::PasswordHash)
}

/// Check a password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> ServerResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| ServerError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// The authenticated account behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserRow);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ServerError::Unauthorized)?;

        let user_id = verify_token(&state.jwt_decoding_key, bearer.token())?;
        let user = queries::user::get_user_by_id(state.db.pool(), user_id)
            .await?
            .filter(|u| u.active)
            .ok_or(ServerError::Unauthorized)?;

        debug!(user_id = user.id, "authenticated request");
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_round_trip() {
        let encoding = EncodingKey::from_secret(b"test-secret");
        let decoding = DecodingKey::from_secret(b"test-secret");

        let token = create_token(&encoding, 42, 30).unwrap();
        assert_eq!(verify_token(&decoding, &token).unwrap(), 42);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let encoding = EncodingKey::from_secret(b"one-secret");
        let decoding = DecodingKey::from_secret(b"another-secret");

        let token = create_token(&encoding, 42, 30).unwrap();
        assert!(verify_token(&decoding, &token).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }
}
