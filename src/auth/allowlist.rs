use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::AdminUser;

/// Admin allow-list storage. A trait seam so the gate and the bootstrap
/// flow can be exercised against an in-memory double.
#[async_trait]
pub trait AllowList: Send + Sync {
    async fn find_by_provider_id(
        &self,
        provider_user_id: Uuid,
    ) -> Result<Option<AdminUser>, DatabaseError>;

    /// An empty allow-list is the "setup not completed" state
    async fn is_empty(&self) -> Result<bool, DatabaseError>;

    /// Insert the first admin if and only if the allow-list is still
    /// empty; `None` means a row already existed and nothing was written.
    async fn insert_first(
        &self,
        provider_user_id: Uuid,
        username: &str,
    ) -> Result<Option<AdminUser>, DatabaseError>;
}

const COLUMNS: &str = "id, provider_user_id, username, created_at";

/// Production allow-list over the catalog database
pub struct PgAllowList;

#[async_trait]
impl AllowList for PgAllowList {
    async fn find_by_provider_id(
        &self,
        provider_user_id: Uuid,
    ) -> Result<Option<AdminUser>, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let row = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT {COLUMNS} FROM admin_users WHERE provider_user_id = $1"
        ))
        .bind(provider_user_id)
        .fetch_optional(&pool)
        .await?;
        Ok(row)
    }

    async fn is_empty(&self) -> Result<bool, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM admin_users").fetch_one(&pool).await?;
        Ok(count == 0)
    }

    async fn insert_first(
        &self,
        provider_user_id: Uuid,
        username: &str,
    ) -> Result<Option<AdminUser>, DatabaseError> {
        let pool = DatabaseManager::pool().await?;

        // The emptiness check and the insert happen in one statement, so
        // a concurrent bootstrap attempt cannot slip a second row in
        // between them; the loser sees no returned row.
        let row = sqlx::query_as::<_, AdminUser>(&format!(
            "INSERT INTO admin_users (id, provider_user_id, username, created_at) \
             SELECT $1, $2, $3, now() \
             WHERE NOT EXISTS (SELECT 1 FROM admin_users) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(provider_user_id)
        .bind(username)
        .fetch_optional(&pool)
        .await?;
        Ok(row)
    }
}
