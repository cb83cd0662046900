use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Claims carried by bearer tokens
///
/// Signed with HS256 by the identity provider using the shared secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Identity decoded from a valid token, scoped to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Issue a token for `user_id` valid for `ttl`
pub fn issue_token(secret: &str, user_id: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: Some((now + ttl).timestamp()),
        iat: Some(now.timestamp()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Upstream(format!("Failed to issue token: {}", e)))
}

/// Verify signature and expiry, then require a non-empty user id
///
/// `exp` is optional; when present it must not have passed.
pub fn verify_token(token: &str, secret: &str) -> Result<AuthenticatedUser> {
    let mut validation = Validation::default();
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("Invalid or expired token: {}", e);
        AppError::InvalidToken
    })?;

    if data.claims.user_id.is_empty() {
        tracing::warn!("Token carries an empty userId");
        return Err(AppError::InvalidToken);
    }

    Ok(AuthenticatedUser {
        user_id: data.claims.user_id,
    })
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)
}
