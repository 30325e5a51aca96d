//! JWT authentication utilities.
//!
//! Tokens carry a subject (user id) and a role claim; verification yields a
//! [`Principal`] for the access-control core. Password handling is NOT
//! included; account management is an external collaborator.

use hyper::http::HeaderMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Auth as AuthConfig;
use crate::error::{Error, Result};
use crate::principal::{Principal, Role};

const MIN_SECRET_LENGTH: usize = 32;

fn validate_secret(config: &AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < MIN_SECRET_LENGTH {
        return Err(Error::Config(format!(
            "JWT secret must be at least {MIN_SECRET_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role of the subject
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Create a JWT token for a user with the given role.
pub fn create_token(config: &AuthConfig, user_id: Uuid, role: Role) -> Result<String> {
    validate_secret(config)?;
    let now = jiff::Timestamp::now();
    let hours = config.token_expiry_days as i64 * 24;
    let exp = now + jiff::Span::new().hours(hours);

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: exp.as_second(),
        iat: now.as_second(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Token creation failed: {e}")))?;

    Ok(token)
}

/// Verify and decode a JWT token.
///
/// Any validation failure, including expiry, reads as `NotAuthenticated`;
/// the caller never learns why a token was rejected.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims> {
    validate_secret(config)?;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| Error::NotAuthenticated)?;

    Ok(token_data.claims)
}

/// Resolve the request's principal from the Authorization header.
///
/// A missing header is a legitimate anonymous request. A present but
/// malformed or invalid Bearer token is an error; read endpoints that
/// tolerate anonymity still must not accept garbage credentials silently.
pub fn extract_principal(headers: &HeaderMap, config: &AuthConfig) -> Result<Principal> {
    let Some(auth_header) = headers.get("Authorization").and_then(|h| h.to_str().ok()) else {
        return Ok(Principal::Anonymous);
    };

    let token = auth_header
        .get(..7)
        .filter(|p| p.eq_ignore_ascii_case("bearer "))
        .map(|_| &auth_header[7..])
        .ok_or(Error::NotAuthenticated)?;

    let claims = verify_token(config, token)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| Error::NotAuthenticated)?;

    Ok(Principal::from_claims(id, claims.role))
}
