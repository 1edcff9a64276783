//! Audit logging middleware.
//!
//! Logs every API request with principal, method, path, and response
//! status. Runs innermost (after auth has injected `IdentityContext`).

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::identity::IdentityContext;

/// Log API access for audit trail.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let principal = req
        .extensions()
        .get::<IdentityContext>()
        .map(|c| c.username().to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let response = next.run(req).await;

    tracing::info!(
        principal,
        method,
        path,
        status = response.status().as_u16(),
        "API access"
    );
    response
}
