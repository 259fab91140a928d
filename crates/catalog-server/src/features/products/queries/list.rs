use catalog_common::{CatalogError, Product};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    features::{
        shared::{PageRequest, PageValidationError, SortField, SortOrder, SortSpec},
        FeatureState,
    },
    storage::{ListParams, StoreError},
};

/// Query for one page of the catalog
///
/// `page_number` and `page_size` are required; sorting defaults to name,
/// ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProductsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_ascending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListProductsError {
    #[error("page_number is required")]
    MissingPageNumber,
    #[error("page_size is required")]
    MissingPageSize,
    #[error("{0}")]
    Page(#[from] PageValidationError),
    #[error("{0}")]
    SortField(CatalogError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Listing did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl ListProductsQuery {
    /// Resolve the raw query into validated listing parameters
    pub fn validate(&self) -> Result<ListParams, ListProductsError> {
        let page_number = self.page_number.ok_or(ListProductsError::MissingPageNumber)?;
        let page_size = self.page_size.ok_or(ListProductsError::MissingPageSize)?;
        let page = PageRequest::new(page_number, page_size)?;

        let field =
            SortField::from_request(self.sort_by.as_deref()).map_err(ListProductsError::SortField)?;

        Ok(ListParams {
            sort: SortSpec {
                field,
                order: SortOrder::from_ascending(self.sort_ascending),
            },
            page,
        })
    }
}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: ListProductsQuery,
) -> Result<Vec<Product>, ListProductsError> {
    let params = query.validate()?;
    let deadline = state.settings.rpc_timeout;

    let products = tokio::time::timeout(deadline, state.store.list(&params))
        .await
        .map_err(|_| ListProductsError::DeadlineExceeded(deadline))??;

    tracing::debug!(
        sort_by = %params.sort.field,
        page_number = params.page.page_number(),
        returned = products.len(),
        "Products listed"
    );

    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{
        features::RequestSettings,
        storage::{MemoryProductStore, ProductStore},
    };
    use catalog_common::IngestedRecord;
    use catalog_ingest::feed::{FeedFetcher, FetcherConfig};
    use chrono::Utc;
    use std::sync::Arc;

    fn query(page_number: i64, page_size: i64) -> ListProductsQuery {
        ListProductsQuery {
            page_number: Some(page_number),
            page_size: Some(page_size),
            ..ListProductsQuery::default()
        }
    }

    async fn state_with(names: &[&str]) -> FeatureState {
        let store = MemoryProductStore::new();
        for (i, name) in names.iter().enumerate() {
            store
                .upsert_price(&IngestedRecord::new(*name, (i + 1) as f64), Utc::now())
                .await
                .unwrap();
        }
        FeatureState {
            store: Arc::new(store),
            fetcher: FeedFetcher::new(FetcherConfig::default()).unwrap(),
            settings: RequestSettings::default(),
        }
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_validate_requires_page_fields() {
        let missing_number = ListProductsQuery {
            page_size: Some(10),
            ..ListProductsQuery::default()
        };
        assert!(matches!(
            missing_number.validate(),
            Err(ListProductsError::MissingPageNumber)
        ));

        let missing_size = ListProductsQuery {
            page_number: Some(1),
            ..ListProductsQuery::default()
        };
        assert!(matches!(missing_size.validate(), Err(ListProductsError::MissingPageSize)));
    }

    #[test]
    fn test_validate_page_bounds() {
        assert!(matches!(query(0, 10).validate(), Err(ListProductsError::Page(_))));
        assert!(matches!(query(1, 0).validate(), Err(ListProductsError::Page(_))));
        assert!(matches!(query(1, 1001).validate(), Err(ListProductsError::Page(_))));
    }

    #[test]
    fn test_validate_sort_defaults() {
        let params = query(1, 10).validate().unwrap();
        assert_eq!(params.sort.field, SortField::Name);
        assert_eq!(params.sort.order, SortOrder::Ascending);

        let unknown = ListProductsQuery {
            sort_by: Some("colour".to_string()),
            ..query(1, 10)
        };
        assert!(matches!(unknown.validate(), Err(ListProductsError::SortField(_))));
    }

    #[tokio::test]
    async fn test_list_pages_through_catalog() {
        let state = state_with(&["a", "b", "c", "d", "e"]).await;

        let third = handle(state.clone(), query(3, 2)).await.unwrap();
        assert_eq!(names(&third), vec!["e"]);

        let fourth = handle(state, query(4, 2)).await.unwrap();
        assert!(fourth.is_empty());
    }

    #[tokio::test]
    async fn test_concatenated_pages_match_full_listing() {
        let state = state_with(&["pear", "Apple", "fig", "banana", "Cherry", "date", "kiwi"]).await;

        let full = handle(state.clone(), query(1, 100)).await.unwrap();
        let mut paged = Vec::new();
        for page in 1..=4 {
            let products = handle(state.clone(), query(page, 2)).await.unwrap();
            assert!(products.len() <= 2);
            paged.extend(products);
        }

        assert_eq!(paged, full);
    }

    #[tokio::test]
    async fn test_list_by_price_descending() {
        let state = state_with(&["cheap", "middle", "dear"]).await;
        let query = ListProductsQuery {
            sort_by: Some("price".to_string()),
            sort_ascending: Some(false),
            ..query(1, 10)
        };

        let products = handle(state, query).await.unwrap();
        assert_eq!(names(&products), vec!["dear", "middle", "cheap"]);
    }
}
