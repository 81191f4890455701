//! Token creation, verification and refresh.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use brs_config::JwtConfig;
use brs_core::AppError;

use crate::claims::{Claims, TokenSubject};

fn now() -> usize {
    Utc::now().timestamp() as usize
}

fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

fn build_claims(
    subject: &TokenSubject,
    issued_at: usize,
    orig_iat: usize,
    jwt_config: &JwtConfig,
) -> Claims {
    Claims {
        sub: subject.user_id.to_string(),
        username: subject.username.clone(),
        roles: subject.roles.clone(),
        admin_dep: subject.admin_dep,
        is_staff: subject.is_staff,
        exp: issued_at + jwt_config.access_token_expiry.max(0) as usize,
        iat: issued_at,
        orig_iat,
    }
}

/// Creates a fresh access token for a user who just logged in.
pub fn create_access_token(
    subject: &TokenSubject,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let issued_at = now();
    encode_claims(
        &build_claims(subject, issued_at, issued_at, jwt_config),
        jwt_config,
    )
}

/// Verifies signature and expiry and returns the embedded claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}

/// Issues a new token from a still-valid one.
///
/// `subject` is re-read from storage by the caller so role changes are
/// picked up. The refresh chain keeps the original login time and stops once
/// `refresh_token_expiry` seconds have passed since it.
pub fn refresh_access_token(
    previous: &Claims,
    subject: &TokenSubject,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let issued_at = now();
    if issued_at > previous.orig_iat + jwt_config.refresh_token_expiry.max(0) as usize {
        return Err(AppError::unauthorized("Refresh has expired".to_string()));
    }

    encode_claims(
        &build_claims(subject, issued_at, previous.orig_iat, jwt_config),
        jwt_config,
    )
}
