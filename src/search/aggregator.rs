use serde::Serialize;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, ExternalRef, Product, Subcategory};

use super::matcher::{haystack_of, matches_all_tokens, normalize_query};
use super::source::SearchSource;

/// Per-kind truncation limits. A limit of zero means the kind is not
/// wanted: its storage read is skipped entirely and its list and total
/// come back empty.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub products: usize,
    pub categories: usize,
    pub subcategories: usize,
    pub external: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { products: 10, categories: 5, subcategories: 5, external: 5 }
    }
}

/// True per-kind match counts, independent of truncation
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SearchTotals {
    pub products: usize,
    pub categories: usize,
    pub subcategories: usize,
    pub external: usize,
}

/// Ranked, truncated matches per kind plus true totals. Ephemeral,
/// computed per request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEnvelope {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub external: Vec<ExternalRef>,
    pub totals: SearchTotals,
}

impl SearchEnvelope {
    fn empty() -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            subcategories: Vec::new(),
            external: Vec::new(),
            totals: SearchTotals::default(),
        }
    }
}

/// Aggregate search across products, categories, subcategories and the
/// external reference list.
///
/// Matching is AND-of-substrings over each record's searchable text;
/// result order within a kind preserves storage read order. Any kind's
/// storage failure fails the whole call. An empty or whitespace-only
/// query short-circuits to an empty envelope without touching storage.
pub async fn perform_search(
    source: &dyn SearchSource,
    query: &str,
    limits: SearchLimits,
) -> Result<SearchEnvelope, DatabaseError> {
    let tokens = normalize_query(query);
    if tokens.is_empty() {
        return Ok(SearchEnvelope::empty());
    }

    let (products, categories, subcategories, external) = futures::try_join!(
        async {
            if limits.products == 0 { Ok(Vec::new()) } else { source.products().await }
        },
        async {
            if limits.categories == 0 { Ok(Vec::new()) } else { source.categories().await }
        },
        async {
            if limits.subcategories == 0 { Ok(Vec::new()) } else { source.subcategories().await }
        },
        async {
            if limits.external == 0 { Ok(Vec::new()) } else { source.external_refs().await }
        },
    )?;

    let mut products: Vec<Product> = products
        .into_iter()
        .filter(|p| matches_all_tokens(&product_haystack(p), &tokens))
        .collect();
    let mut categories: Vec<Category> =
        categories.into_iter().filter(|c| matches_all_tokens(&c.name, &tokens)).collect();
    let mut subcategories: Vec<Subcategory> =
        subcategories.into_iter().filter(|s| matches_all_tokens(&s.name, &tokens)).collect();
    let mut external: Vec<ExternalRef> = external
        .into_iter()
        .filter(|e| matches_all_tokens(&external_haystack(e), &tokens))
        .collect();

    let totals = SearchTotals {
        products: products.len(),
        categories: categories.len(),
        subcategories: subcategories.len(),
        external: external.len(),
    };

    products.truncate(limits.products);
    categories.truncate(limits.categories);
    subcategories.truncate(limits.subcategories);
    external.truncate(limits.external);

    Ok(SearchEnvelope { products, categories, subcategories, external, totals })
}

fn product_haystack(p: &Product) -> String {
    haystack_of(&[
        Some(&p.title),
        p.order_number.as_deref(),
        p.code_number.as_deref(),
        Some(&p.brand),
        Some(&p.category),
        p.description.as_deref(),
    ])
}

fn external_haystack(e: &ExternalRef) -> String {
    haystack_of(&[Some(&e.name), e.code.as_deref()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// In-memory source that counts how many storage reads were made
    struct MemorySource {
        products: Vec<Product>,
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
        external: Vec<ExternalRef>,
        calls: AtomicUsize,
    }

    impl MemorySource {
        fn new() -> Self {
            Self {
                products: Vec::new(),
                categories: Vec::new(),
                subcategories: Vec::new(),
                external: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchSource for MemorySource {
        async fn products(&self) -> Result<Vec<Product>, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.products.clone())
        }

        async fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.categories.clone())
        }

        async fn subcategories(&self) -> Result<Vec<Subcategory>, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.subcategories.clone())
        }

        async fn external_refs(&self) -> Result<Vec<ExternalRef>, DatabaseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.external.clone())
        }
    }

    /// Source where one kind fails, for the fail-whole-call contract
    struct FailingSource(MemorySource);

    #[async_trait]
    impl SearchSource for FailingSource {
        async fn products(&self) -> Result<Vec<Product>, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }

        async fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
            self.0.categories().await
        }

        async fn subcategories(&self) -> Result<Vec<Subcategory>, DatabaseError> {
            self.0.subcategories().await
        }

        async fn external_refs(&self) -> Result<Vec<ExternalRef>, DatabaseError> {
            self.0.external_refs().await
        }
    }

    fn product(title: &str, brand: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            slug: crate::catalog::slugify(title),
            title: title.to_string(),
            description: None,
            brand: brand.to_string(),
            category: "components".to_string(),
            subcategory: None,
            order_number: None,
            code_number: None,
            details: serde_json::json!({}),
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: crate::catalog::slugify(name),
            main_image: None,
            industries: Vec::new(),
        }
    }

    fn sample_source() -> MemorySource {
        let mut source = MemorySource::new();
        source.products.push(product("Eaton MCB Breaker 32A", "Eaton"));
        source.products.push(product("Degson Terminal Block", "Degson"));
        source.categories.push(category("Circuit Protection"));
        source.categories.push(category("Terminal Blocks"));
        source
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits_without_storage_calls() {
        let source = sample_source();

        for query in ["", "   ", "\t\n"] {
            let envelope =
                perform_search(&source, query, SearchLimits::default()).await.unwrap();
            assert!(envelope.products.is_empty());
            assert!(envelope.categories.is_empty());
            assert!(envelope.subcategories.is_empty());
            assert!(envelope.external.is_empty());
            assert_eq!(envelope.totals, SearchTotals::default());
        }

        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_and_of_substrings_across_fields() {
        let source = sample_source();

        let envelope =
            perform_search(&source, "eaton breaker", SearchLimits::default()).await.unwrap();
        assert_eq!(envelope.products.len(), 1);
        assert_eq!(envelope.products[0].title, "Eaton MCB Breaker 32A");
        assert_eq!(envelope.totals.products, 1);

        // single token still excludes the non-matching product
        let envelope = perform_search(&source, "breaker", SearchLimits::default()).await.unwrap();
        assert_eq!(envelope.products.len(), 1);
        assert_eq!(envelope.products[0].title, "Eaton MCB Breaker 32A");
    }

    #[tokio::test]
    async fn test_totals_survive_truncation() {
        let mut source = MemorySource::new();
        for i in 0..7 {
            source.products.push(product(&format!("Eaton Contactor {i}"), "Eaton"));
        }

        let limits = SearchLimits { products: 3, ..SearchLimits::default() };
        let envelope = perform_search(&source, "eaton", limits).await.unwrap();

        assert_eq!(envelope.products.len(), 3);
        assert_eq!(envelope.totals.products, 7);
    }

    #[tokio::test]
    async fn test_limit_zero_skips_kind_entirely() {
        let source = sample_source();

        let limits = SearchLimits { products: 0, categories: 0, subcategories: 5, external: 5 };
        let envelope = perform_search(&source, "terminal", limits).await.unwrap();

        assert!(envelope.products.is_empty());
        assert!(envelope.categories.is_empty());
        assert_eq!(envelope.totals.products, 0);
        assert_eq!(envelope.totals.categories, 0);
        // only subcategories and external refs were read
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_truncated_len_is_min_of_total_and_limit() {
        let mut source = MemorySource::new();
        for i in 0..4 {
            source.categories.push(category(&format!("Automation {i}")));
        }

        for limit in [0usize, 1, 4, 10] {
            let limits = SearchLimits {
                products: 0,
                categories: limit,
                subcategories: 0,
                external: 0,
            };
            let envelope = perform_search(&source, "automation", limits).await.unwrap();
            let total = if limit == 0 { 0 } else { 4 };
            assert_eq!(envelope.categories.len(), total.min(limit));
        }
    }

    #[tokio::test]
    async fn test_category_name_matching() {
        let source = sample_source();

        let envelope = perform_search(&source, "terminal", SearchLimits::default()).await.unwrap();
        assert_eq!(envelope.categories.len(), 1);
        assert_eq!(envelope.categories[0].name, "Terminal Blocks");
        // the Degson product matches too
        assert_eq!(envelope.products.len(), 1);
        assert_eq!(envelope.products[0].brand, "Degson");
    }

    #[tokio::test]
    async fn test_storage_failure_fails_whole_call() {
        let source = FailingSource(sample_source());

        let result = perform_search(&source, "eaton", SearchLimits::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_preserves_storage_read_order() {
        let mut source = MemorySource::new();
        source.products.push(product("Eaton A", "Eaton"));
        source.products.push(product("Eaton B", "Eaton"));
        source.products.push(product("Eaton C", "Eaton"));

        let envelope = perform_search(&source, "eaton", SearchLimits::default()).await.unwrap();
        let titles: Vec<&str> = envelope.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Eaton A", "Eaton B", "Eaton C"]);
    }
}
