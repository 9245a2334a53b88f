use std::sync::Arc;

use crate::auth::allowlist::{AllowList, PgAllowList};
use crate::config;
use crate::identity::IdentityProvider;
use crate::ratelimit::{MemoryRateLimiter, RateLimiter};
use crate::storage::StorageClient;

/// Shared per-process services injected into handlers and middleware.
/// The database pool is not here; it lives behind the DatabaseManager
/// singleton.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub allowlist: Arc<dyn AllowList>,
    pub limiter: Arc<dyn RateLimiter>,
    pub storage: Arc<StorageClient>,
}

impl AppState {
    /// Wire the production services from configuration
    pub fn from_config() -> Self {
        let cfg = config::config();
        Self {
            identity: Arc::from(crate::identity::from_config(&cfg.identity)),
            allowlist: Arc::new(PgAllowList),
            limiter: Arc::new(MemoryRateLimiter::new()),
            storage: Arc::new(StorageClient::from_config(&cfg.storage)),
        }
    }
}
