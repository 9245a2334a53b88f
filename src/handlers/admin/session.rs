use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, cookies, AuthError};
use crate::config;
use crate::error::ApiError;
use crate::handlers::enforce_rate_limit;
use crate::middleware::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub access_token: String,
}

/// POST /api/admin/session - exchange a provider access token for the
/// admin session cookie.
///
/// A credential-verification surface, so it is rate-limited. Unlike the
/// merged 401s of the gate, this endpoint does distinguish an invalid
/// token (401) from a valid non-admin account (403): the caller has
/// already authenticated against the provider, so admin status is not a
/// secret from them.
pub async fn session_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SessionRequest>,
) -> Result<Response, ApiError> {
    let limits = config::config().rate_limit.clone();
    enforce_rate_limit(
        &state,
        "admin-session",
        &headers,
        limits.session_limit,
        limits.session_window_secs,
    )?;

    let token = payload.access_token.trim();
    if token.is_empty() {
        return Err(ApiError::bad_request("access_token is required"));
    }

    match auth::resolve_admin_session(&state, token).await {
        Ok(session) => {
            tracing::info!("admin session established for {}", session.username);

            let cookie = cookies::session_cookie(token);
            let mut response =
                ApiResponse::success(json!({ "isAdmin": true, "username": session.username }))
                    .into_response();
            response.headers_mut().insert(
                header::SET_COOKIE,
                HeaderValue::from_str(&cookie)
                    .map_err(|_| ApiError::internal_server_error("Failed to set session cookie"))?,
            );
            Ok(response)
        }
        Err(AuthError::NotAdmin) => Err(ApiError::forbidden("Not an administrator")),
        Err(AuthError::MissingToken) | Err(AuthError::InvalidToken) => {
            Err(ApiError::unauthorized("Invalid token"))
        }
        Err(other) => Err(other.into()),
    }
}

/// GET /api/admin/session-status - report whether the cookie carries a
/// live admin session. Always 200; an absent, expired or non-admin
/// session is just `isAdmin: false`.
pub async fn session_status_get(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse<serde_json::Value> {
    let is_admin = match auth::session_cookie_token(&headers) {
        Some(token) => auth::resolve_admin_session(&state, &token).await.is_ok(),
        None => false,
    };

    ApiResponse::success(json!({ "isAdmin": is_admin }))
}

/// POST /api/admin/logout - clear the session cookie
pub async fn logout_post() -> Result<Response, ApiError> {
    let mut response = ApiResponse::success(json!({ "loggedOut": true })).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookies::clear_session_cookie())
            .map_err(|_| ApiError::internal_server_error("Failed to clear session cookie"))?,
    );
    Ok(response)
}

/// GET /api/admin/me - resolve admin status from a bearer token. The
/// admin UI calls this on load; denial is a uniform 401.
pub async fn me_get(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let token = auth::bearer_token(&headers).ok_or(AuthError::MissingToken).map_err(ApiError::from)?;

    let session = auth::resolve_admin_session(&state, &token).await?;
    Ok(ApiResponse::success(json!({ "isAdmin": true, "username": session.username })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalJwtProvider;
    use crate::testing::{app_state, MemoryAllowList};
    use axum::http::HeaderValue;
    use std::sync::Arc;
    use uuid::Uuid;

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_str(&format!("admin_token={}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_session_status_true_for_live_admin_session() {
        let provider = Arc::new(LocalJwtProvider::new("secret".to_string()));
        let user_id = Uuid::new_v4();
        let state = app_state(provider.clone(), Arc::new(MemoryAllowList::with_admin(user_id)));

        let token = provider.issue(user_id, None, 1).unwrap();
        let response = session_status_get(State(state), cookie_headers(&token)).await;

        assert_eq!(response.data, json!({ "isAdmin": true }));
    }

    #[tokio::test]
    async fn test_session_status_false_for_expired_cookie() {
        let provider = Arc::new(LocalJwtProvider::new("secret".to_string()));
        let user_id = Uuid::new_v4();
        let state = app_state(provider.clone(), Arc::new(MemoryAllowList::with_admin(user_id)));

        // minted longer ago than the cookie lifetime
        let stale = provider.issue(user_id, None, -24 * 8).unwrap();
        let response = session_status_get(State(state), cookie_headers(&stale)).await;

        assert_eq!(response.data, json!({ "isAdmin": false }));
    }

    #[tokio::test]
    async fn test_session_status_false_for_unlisted_account() {
        let provider = Arc::new(LocalJwtProvider::new("secret".to_string()));
        let state =
            app_state(provider.clone(), Arc::new(MemoryAllowList::with_admin(Uuid::new_v4())));

        let token = provider.issue(Uuid::new_v4(), None, 1).unwrap();
        let response = session_status_get(State(state), cookie_headers(&token)).await;

        assert_eq!(response.data, json!({ "isAdmin": false }));
    }

    #[tokio::test]
    async fn test_session_status_false_without_cookie() {
        let provider = Arc::new(LocalJwtProvider::new("secret".to_string()));
        let state = app_state(provider, Arc::new(MemoryAllowList::new()));

        let response = session_status_get(State(state), HeaderMap::new()).await;
        assert_eq!(response.data, json!({ "isAdmin": false }));
    }
}
