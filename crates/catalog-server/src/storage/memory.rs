//! In-memory product store
//!
//! Backs tests and `CATALOG_STORAGE_BACKEND=memory` runs. Contents live
//! for the lifetime of the process only.

use async_trait::async_trait;
use catalog_common::{IngestedRecord, Product};
use chrono::{DateTime, Utc};
use icu_collator::{Collator, CollatorError, CollatorOptions, Strength};
use icu_locid::locale;
use std::{cmp::Ordering, collections::HashMap};
use tokio::sync::RwLock;

use super::{check_record, ListParams, ProductStore, StorageBackend, StoreResult};
use crate::features::shared::{SortField, SortOrder};

#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<HashMap<String, Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    /// Look up a single product by exact name
    pub async fn get(&self, name: &str) -> Option<Product> {
        self.products.read().await.get(name).cloned()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn upsert_price(&self, record: &IngestedRecord, at: DateTime<Utc>) -> StoreResult<Product> {
        check_record(record)?;

        let mut products = self.products.write().await;
        let product = products
            .entry(record.name.clone())
            .and_modify(|existing| {
                existing.price = record.price;
                existing.last_update = at;
                existing.price_change_count += 1;
            })
            .or_insert_with(|| Product {
                name: record.name.clone(),
                price: record.price,
                price_change_count: 1,
                last_update: at,
            });

        Ok(product.clone())
    }

    async fn list(&self, params: &ListParams) -> StoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let collator = name_collator()?;
        let mut sorted: Vec<&Product> = products.values().collect();
        sorted.sort_by(|a, b| compare(&collator, a, b, params.sort.field, params.sort.order));

        let offset = usize::try_from(params.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(params.page.limit()).unwrap_or(0);

        Ok(sorted
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// English collation at secondary strength: accents count, case does not.
/// Matches the `catalog_en_ci` collation used by the Postgres store.
fn name_collator() -> Result<Collator, CollatorError> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    Collator::try_new(&locale!("en").into(), options)
}

fn compare(
    collator: &Collator,
    a: &Product,
    b: &Product,
    field: SortField,
    order: SortOrder,
) -> Ordering {
    let primary = match field {
        SortField::Name => collator.compare(&a.name, &b.name),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::PriceChangeCount => a.price_change_count.cmp(&b.price_change_count),
        SortField::LastUpdate => a.last_update.cmp(&b.last_update),
    };
    let ordering = primary.then_with(|| a.name.cmp(&b.name));

    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}
