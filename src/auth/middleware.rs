use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::jwt::{JwtKeys, TokenError};
use crate::error::AppError;

/// Rejects the request before it reaches the handler unless it carries a
/// valid bearer token; on success the caller's `AuthUser` rides along in the
/// request extensions.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?.to_owned();

    let user = keys.authenticate(&token).map_err(|e| {
        warn!(error = %e, "token rejected");
        AppError::from(e)
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers.get(AUTHORIZATION).ok_or(AppError::MissingToken)?;
    let value = value
        .to_str()
        .map_err(|_| AppError::Token(TokenError::Malformed))?;

    // Expect "Bearer <token>"
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AppError::Token(TokenError::Malformed))?
        .trim();
    if token.is_empty() {
        return Err(AppError::MissingToken);
    }
    Ok(token)
}
