use axum::{
    extract::{Json, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::config;
use crate::error::ApiError;
use crate::handlers::enforce_rate_limit;
use crate::identity::IdentityError;
use crate::middleware::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Accounts are provisioned at the identity provider, which wants an
/// email address; bare usernames get a fixed admin domain appended.
/// Lowercased either way so the same input always maps to one account.
fn normalize_email(username: &str) -> String {
    let username = username.trim().to_lowercase();
    if username.contains('@') {
        username
    } else {
        format!("{}@admin.transtech.example", username)
    }
}

/// POST /api/admin/setup - one-time bootstrap of the first admin.
///
/// Refuses with 409 once any allow-list row exists. The allow-list
/// insert itself is guarded (first row only), so concurrent bootstrap
/// attempts cannot both win. If the provider account survived a
/// previous attempt that died before the insert, matching credentials
/// re-attach it instead of wedging setup. Rate-limited: it is an
/// unauthenticated surface.
pub async fn setup_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SetupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = config::config().rate_limit.clone();
    enforce_rate_limit(&state, "admin-setup", &headers, limits.setup_limit, limits.setup_window_secs)?;

    let mut errors = HashMap::new();
    if payload.username.trim().is_empty() {
        errors.insert("username".to_string(), "This field is required".to_string());
    }
    if payload.password.len() < 8 {
        errors.insert("password".to_string(), "Must be at least 8 characters".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::validation_error("Invalid request", Some(errors)));
    }

    if !state.allowlist.is_empty().await? {
        return Err(ApiError::conflict("Admin setup has already been completed"));
    }

    let email = normalize_email(&payload.username);
    let user = match state.identity.provision(&email, &payload.password).await {
        Ok(user) => user,
        Err(IdentityError::AccountExists) => state
            .identity
            .authenticate(&email, &payload.password)
            .await
            .map_err(|_| {
                ApiError::conflict("A provider account with this username already exists")
            })?,
        Err(other) => return Err(other.into()),
    };

    let admin = state
        .allowlist
        .insert_first(user.id, &email)
        .await?
        .ok_or_else(|| ApiError::conflict("Admin setup has already been completed"))?;

    tracing::info!("first admin provisioned: {}", admin.username);
    Ok(ApiResponse::created(json!({ "id": admin.id, "username": admin.username })))
}

/// GET /api/admin/setup-status - whether first-run setup has completed
pub async fn setup_status_get(
    State(state): State<AppState>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let completed = !state.allowlist.is_empty().await?;
    Ok(ApiResponse::success(json!({ "setupCompleted": completed })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::allowlist::AllowList;
    use crate::identity::{IdentityProvider, LocalJwtProvider, ProviderUser};
    use crate::testing::{app_state, MemoryAllowList};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use uuid::Uuid;

    fn request(username: &str) -> Json<SetupRequest> {
        Json(SetupRequest {
            username: username.to_string(),
            password: "correct-horse-battery".to_string(),
        })
    }

    #[test]
    fn test_normalize_email_passes_through_emails() {
        assert_eq!(normalize_email("ops@transtech.example"), "ops@transtech.example");
    }

    #[test]
    fn test_normalize_email_lowercases_emails() {
        assert_eq!(normalize_email("Ops@Transtech.Example"), "ops@transtech.example");
        assert_eq!(normalize_email("Ops@X.com"), normalize_email("ops@x.com"));
    }

    #[test]
    fn test_normalize_email_appends_admin_domain() {
        assert_eq!(normalize_email("Admin"), "admin@admin.transtech.example");
        assert_eq!(normalize_email("  ops "), "ops@admin.transtech.example");
    }

    #[tokio::test]
    async fn test_setup_twice_creates_exactly_one_admin() {
        let allowlist = Arc::new(MemoryAllowList::new());
        let state =
            app_state(Arc::new(LocalJwtProvider::new("secret".to_string())), allowlist.clone());

        let first = setup_post(State(state.clone()), HeaderMap::new(), request("ops"))
            .await
            .unwrap()
            .into_response();
        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(allowlist.len(), 1);

        let second = setup_post(State(state), HeaderMap::new(), request("other")).await;
        match second {
            Err(err) => assert_eq!(err.status_code(), 409),
            Ok(_) => panic!("second bootstrap must be refused"),
        }
        assert_eq!(allowlist.len(), 1);
    }

    /// Provider whose account already exists from an earlier attempt
    /// that died before the allow-list insert
    struct OrphanedAccount {
        user_id: Uuid,
    }

    #[async_trait]
    impl IdentityProvider for OrphanedAccount {
        async fn resolve(&self, _token: &str) -> Result<ProviderUser, IdentityError> {
            Err(IdentityError::InvalidToken)
        }

        async fn provision(&self, _e: &str, _p: &str) -> Result<ProviderUser, IdentityError> {
            Err(IdentityError::AccountExists)
        }

        async fn authenticate(&self, email: &str, _p: &str) -> Result<ProviderUser, IdentityError> {
            Ok(ProviderUser { id: self.user_id, email: Some(email.to_string()) })
        }
    }

    #[tokio::test]
    async fn test_setup_reattaches_orphaned_provider_account() {
        let allowlist = Arc::new(MemoryAllowList::new());
        let user_id = Uuid::new_v4();
        let state = app_state(Arc::new(OrphanedAccount { user_id }), allowlist.clone());

        let response = setup_post(State(state), HeaderMap::new(), request("ops"))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(allowlist.len(), 1);
        assert!(allowlist.find_by_provider_id(user_id).await.unwrap().is_some());
    }

    /// Account exists but the supplied password does not match it
    struct ForeignAccount;

    #[async_trait]
    impl IdentityProvider for ForeignAccount {
        async fn resolve(&self, _token: &str) -> Result<ProviderUser, IdentityError> {
            Err(IdentityError::InvalidToken)
        }

        async fn provision(&self, _e: &str, _p: &str) -> Result<ProviderUser, IdentityError> {
            Err(IdentityError::AccountExists)
        }

        async fn authenticate(&self, _e: &str, _p: &str) -> Result<ProviderUser, IdentityError> {
            Err(IdentityError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn test_setup_refuses_foreign_provider_account() {
        let allowlist = Arc::new(MemoryAllowList::new());
        let state = app_state(Arc::new(ForeignAccount), allowlist.clone());

        let result = setup_post(State(state), HeaderMap::new(), request("ops")).await;
        match result {
            Err(err) => assert_eq!(err.status_code(), 409),
            Ok(_) => panic!("unverifiable account must not become admin"),
        }
        assert_eq!(allowlist.len(), 0);
    }

    #[tokio::test]
    async fn test_setup_status_flips_after_bootstrap() {
        let allowlist = Arc::new(MemoryAllowList::new());
        let state =
            app_state(Arc::new(LocalJwtProvider::new("secret".to_string())), allowlist.clone());

        let before = setup_status_get(State(state.clone())).await.unwrap();
        assert_eq!(before.data, json!({ "setupCompleted": false }));

        setup_post(State(state.clone()), HeaderMap::new(), request("ops")).await.unwrap();

        let after = setup_status_get(State(state)).await.unwrap();
        assert_eq!(after.data, json!({ "setupCompleted": true }));
    }
}
