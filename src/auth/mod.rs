pub mod allowlist;
pub mod cookies;

use axum::http::HeaderMap;
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::error::ApiError;
use crate::identity::IdentityError;
use crate::state::AppState;

/// Verified admin context: the token resolved to a provider account that
/// is on the allow-list
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: Uuid,
    pub provider_user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no token supplied")]
    MissingToken,

    #[error("token rejected")]
    InvalidToken,

    /// Valid account, but not on the allow-list. Collapsed with the two
    /// cases above into the same 401 at the API boundary so responses do
    /// not reveal whether an account exists.
    #[error("account is not an administrator")]
    NotAdmin,

    #[error(transparent)]
    Identity(IdentityError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken => AuthError::InvalidToken,
            other => AuthError::Identity(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::NotAdmin => {
                ApiError::unauthorized("Unauthorized")
            }
            AuthError::Identity(e) => e.into(),
            AuthError::Database(e) => e.into(),
        }
    }
}

/// Resolve a token to an admin session: one identity-provider round trip
/// followed by one allow-list read. No caching across requests; every
/// admin-scoped request re-verifies from scratch.
pub async fn resolve_admin_session(
    state: &AppState,
    token: &str,
) -> Result<AdminSession, AuthError> {
    let user = state.identity.resolve(token).await?;

    let admin = state.allowlist.find_by_provider_id(user.id).await?;

    match admin {
        Some(admin) => Ok(AdminSession {
            admin_id: admin.id,
            provider_user_id: admin.provider_user_id,
            username: admin.username,
        }),
        None => Err(AuthError::NotAdmin),
    }
}

/// Extract a bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("authorization").or_else(|| headers.get("Authorization"))?;
    let auth_str = auth_header.to_str().ok()?;

    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Extract the admin session token from the configured cookie
pub fn session_cookie_token(headers: &HeaderMap) -> Option<String> {
    cookies::get(headers, &config::config().session.cookie_name)
}

/// Bearer token if present, else the session cookie. API routes accept
/// either; the page gate relies on the cookie alone.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| session_cookie_token(headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with("authorization", "Bearer abc123");
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let headers = headers_with("authorization", "Basic abc123");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_rejects_empty() {
        let headers = headers_with("authorization", "Bearer   ");
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_deny_variants_collapse_to_identical_response() {
        let denied = [AuthError::MissingToken, AuthError::InvalidToken, AuthError::NotAdmin];

        let responses: Vec<(u16, serde_json::Value)> = denied
            .into_iter()
            .map(|e| {
                let api = ApiError::from(e);
                (api.status_code(), api.to_json())
            })
            .collect();

        // no-token, bad-token and not-listed must be indistinguishable
        assert!(responses.iter().all(|(status, _)| *status == 401));
        assert!(responses.windows(2).all(|pair| pair[0].1 == pair[1].1));
    }
}
