//! HTTP Basic authentication middleware.
//!
//! Extracts `Authorization: Basic <base64(user:password)>`, verifies the
//! credentials, and injects the caller's `IdentityContext` into request
//! extensions for downstream handlers.

use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Require valid Basic credentials.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let (username, password) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic)
        .ok_or(ApiError::Unauthorized)?;

    // Key derivation is CPU-bound; keep it off the async workers.
    let service = ctx.service.clone();
    let identity = tokio::task::spawn_blocking(move || service.authenticate(&username, &password))
        .await
        .map_err(|e| ApiError::Internal(format!("auth task: {e}")))??;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Decode a Basic authorization header value into (username, password).
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    if user.is_empty() {
        return None;
    }
    Some((user.to_string(), pass.to_string()))
}
