use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::Result;
use crate::security::{bearer_token, verify_token};
use crate::AppState;

/// Require a valid bearer token and attach the caller's identity
///
/// Missing or non-Bearer header → 401, failed verification → 403. On success
/// handlers read [`crate::security::AuthenticatedUser`] from the extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = bearer_token(header_value).map_err(|e| {
        tracing::warn!("No token provided or invalid format");
        e
    })?;
    let user = verify_token(token, &state.config.jwt_secret)?;

    tracing::debug!("Token validated for user {}", user.user_id);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
