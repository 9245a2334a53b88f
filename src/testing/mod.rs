//! Shared test doubles for the seams in `AppState`.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::allowlist::AllowList;
use crate::config::StorageConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::AdminUser;
use crate::identity::IdentityProvider;
use crate::ratelimit::MemoryRateLimiter;
use crate::state::AppState;
use crate::storage::StorageClient;

/// AppState wired with doubles. Storage points at a closed port; tests
/// using this state never reach it.
pub fn app_state(identity: Arc<dyn IdentityProvider>, allowlist: Arc<dyn AllowList>) -> AppState {
    let storage = StorageConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        bucket: "uploads".to_string(),
        service_key: String::new(),
    };
    AppState {
        identity,
        allowlist,
        limiter: Arc::new(MemoryRateLimiter::new()),
        storage: Arc::new(StorageClient::from_config(&storage)),
    }
}

/// In-memory allow-list with the same first-row-only insert guard as
/// the database-backed implementation
#[derive(Default)]
pub struct MemoryAllowList {
    rows: Mutex<Vec<AdminUser>>,
}

impl MemoryAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(provider_user_id: Uuid) -> Self {
        let list = Self::default();
        list.rows
            .lock()
            .unwrap()
            .push(admin_row(provider_user_id, "ops@admin.transtech.example"));
        list
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn admin_row(provider_user_id: Uuid, username: &str) -> AdminUser {
    AdminUser {
        id: Uuid::new_v4(),
        provider_user_id,
        username: username.to_string(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl AllowList for MemoryAllowList {
    async fn find_by_provider_id(
        &self,
        provider_user_id: Uuid,
    ) -> Result<Option<AdminUser>, DatabaseError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.provider_user_id == provider_user_id).cloned())
    }

    async fn is_empty(&self) -> Result<bool, DatabaseError> {
        Ok(self.rows.lock().unwrap().is_empty())
    }

    async fn insert_first(
        &self,
        provider_user_id: Uuid,
        username: &str,
    ) -> Result<Option<AdminUser>, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.is_empty() {
            return Ok(None);
        }
        let row = admin_row(provider_user_id, username);
        rows.push(row.clone());
        Ok(Some(row))
    }
}
