use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::enforce_rate_limit;
use crate::middleware::response::ApiResponse;
use crate::search::{perform_search, PgSearchSource, SearchEnvelope, SearchLimits};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Shared cap applied to every kind unless overridden per kind
    pub limit: Option<usize>,
    #[serde(rename = "limitProducts")]
    pub limit_products: Option<usize>,
    #[serde(rename = "limitCategories")]
    pub limit_categories: Option<usize>,
    #[serde(rename = "limitSubcategories")]
    pub limit_subcategories: Option<usize>,
    #[serde(rename = "limitExternal")]
    pub limit_external: Option<usize>,
}

impl SearchQuery {
    fn limits(&self) -> SearchLimits {
        let defaults = SearchLimits::default();
        let shared = self.limit;
        SearchLimits {
            products: self.limit_products.or(shared).unwrap_or(defaults.products),
            categories: self.limit_categories.or(shared).unwrap_or(defaults.categories),
            subcategories: self.limit_subcategories.or(shared).unwrap_or(defaults.subcategories),
            external: self.limit_external.or(shared).unwrap_or(defaults.external),
        }
    }
}

/// GET /api/search - aggregate search across the catalog
pub async fn search_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<SearchEnvelope>, ApiError> {
    let limits = config::config().rate_limit.clone();
    enforce_rate_limit(&state, "search", &headers, limits.search_limit, limits.search_window_secs)?;

    let pool = DatabaseManager::pool().await?;
    let source = PgSearchSource::new(pool);

    let envelope = perform_search(&source, &query.q, query.limits()).await?;
    Ok(ApiResponse::success(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str) -> SearchQuery {
        SearchQuery {
            q: q.to_string(),
            limit: None,
            limit_products: None,
            limit_categories: None,
            limit_subcategories: None,
            limit_external: None,
        }
    }

    #[test]
    fn test_shared_limit_applies_to_all_kinds() {
        let mut sq = query("breaker");
        sq.limit = Some(3);
        let limits = sq.limits();
        assert_eq!(limits.products, 3);
        assert_eq!(limits.categories, 3);
        assert_eq!(limits.subcategories, 3);
        assert_eq!(limits.external, 3);
    }

    #[test]
    fn test_per_kind_limit_overrides_shared() {
        let mut sq = query("breaker");
        sq.limit = Some(3);
        sq.limit_products = Some(10);
        sq.limit_external = Some(0);
        let limits = sq.limits();
        assert_eq!(limits.products, 10);
        assert_eq!(limits.categories, 3);
        assert_eq!(limits.external, 0);
    }

    #[test]
    fn test_defaults_when_unspecified() {
        let limits = query("breaker").limits();
        let defaults = SearchLimits::default();
        assert_eq!(limits.products, defaults.products);
        assert_eq!(limits.categories, defaults.categories);
    }
}
