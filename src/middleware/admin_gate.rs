use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::state::AppState;

/// Bootstrap and session endpoints the gate must not block: without
/// these, no one could ever log in or run first-time setup. Each handles
/// its own credential checks.
const BYPASS_PATHS: &[&str] = &[
    "/api/admin/setup",
    "/api/admin/setup-status",
    "/api/admin/session",
    "/api/admin/session-status",
    "/api/admin/logout",
    "/api/admin/me",
    "/admin/login",
];

/// Where denied page navigations are sent
const LOGIN_PATH: &str = "/admin/login";

fn is_guarded(path: &str) -> bool {
    if BYPASS_PATHS.contains(&path) {
        return false;
    }
    path == "/admin"
        || path.starts_with("/admin/")
        || path == "/api/admin"
        || path.starts_with("/api/admin/")
}

fn is_api_path(path: &str) -> bool {
    path.starts_with("/api/")
}

/// Request-intercepting gate in front of `/admin/*` and `/api/admin/*`.
///
/// API routes accept a bearer token or the session cookie and are denied
/// with a uniform 401; page navigations rely on the cookie and are
/// redirected to the login page instead. Both paths run the exact same
/// resolution: one identity-provider round trip plus one allow-list
/// lookup, re-verified on every request.
pub async fn admin_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let path = request.uri().path().to_string();
    if !is_guarded(&path) {
        return Ok(next.run(request).await);
    }

    let headers = request.headers();
    let token = if is_api_path(&path) {
        auth::request_token(headers)
    } else {
        auth::session_cookie_token(headers)
    };

    let result = match token {
        Some(token) => auth::resolve_admin_session(&state, &token).await,
        None => Err(AuthError::MissingToken),
    };

    match result {
        Ok(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        Err(err) => {
            tracing::debug!("admin gate denied {}: {}", path, err);
            if is_api_path(&path) {
                Err(ApiError::from(err).into_response())
            } else {
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
        }
    }
}
