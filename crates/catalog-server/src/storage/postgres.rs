//! PostgreSQL product store
//!
//! Relies on the `products` table and the `catalog_en_ci` collation created
//! by the migrations in `migrations/`.

use async_trait::async_trait;
use catalog_common::{IngestedRecord, Product};
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;
use tracing::info;

use super::{check_record, ListParams, ProductStore, StorageBackend, StoreResult};
use crate::{
    config::DatabaseConfig,
    features::shared::{SortField, SortOrder},
};

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await?;

        info!("Database connection pool established");

        sqlx::migrate!("../../migrations").run(&pool).await?;

        info!("Database migrations completed");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    name: String,
    price: f64,
    price_change_count: i64,
    last_update: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            name: row.name,
            price: row.price,
            price_change_count: row.price_change_count,
            last_update: row.last_update,
        }
    }
}

/// `ORDER BY` clause for a listing, always ending in the byte-wise name
fn order_by(field: SortField, order: SortOrder) -> String {
    let direction = order.as_sql();
    let primary = match field {
        SortField::Name => "name COLLATE catalog_en_ci",
        SortField::Price => "price",
        SortField::PriceChangeCount => "price_change_count",
        SortField::LastUpdate => "last_update",
    };
    format!("{primary} {direction}, name COLLATE \"C\" {direction}")
}

#[async_trait]
impl ProductStore for PgProductStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Postgres
    }

    #[tracing::instrument(skip(self, record), fields(name = %record.name, price = record.price))]
    async fn upsert_price(&self, record: &IngestedRecord, at: DateTime<Utc>) -> StoreResult<Product> {
        check_record(record)?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, price, price_change_count, last_update)
            VALUES ($1, $2, 1, $3)
            ON CONFLICT (name) DO UPDATE
            SET price = EXCLUDED.price,
                last_update = EXCLUDED.last_update,
                price_change_count = products.price_change_count + 1
            RETURNING name, price, price_change_count, last_update
            "#,
        )
        .bind(&record.name)
        .bind(record.price)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, params: &ListParams) -> StoreResult<Vec<Product>> {
        // The ORDER BY clause comes from a closed set of enum variants, never
        // from caller text.
        let sql = format!(
            r#"
            SELECT name, price, price_change_count, last_update
            FROM products
            ORDER BY {}
            LIMIT $1
            OFFSET $2
            "#,
            order_by(params.sort.field, params.sort.order)
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(params.page.limit())
            .bind(params.page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::features::shared::{PageRequest, SortSpec};

    #[test]
    fn test_order_by_name_uses_collation() {
        assert_eq!(
            order_by(SortField::Name, SortOrder::Ascending),
            "name COLLATE catalog_en_ci ASC, name COLLATE \"C\" ASC"
        );
    }

    #[test]
    fn test_order_by_numeric_field() {
        assert_eq!(
            order_by(SortField::PriceChangeCount, SortOrder::Descending),
            "price_change_count DESC, name COLLATE \"C\" DESC"
        );
    }

    fn params(field: SortField, page_number: i64, page_size: i64) -> ListParams {
        ListParams {
            sort: SortSpec {
                field,
                order: SortOrder::Ascending,
            },
            page: PageRequest::new(page_number, page_size).unwrap(),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_upsert_increments_counter(pool: PgPool) {
        let store = PgProductStore::new(pool);

        let first = store
            .upsert_price(&IngestedRecord::new("Widget", 9.99), Utc::now())
            .await
            .unwrap();
        assert_eq!(first.price_change_count, 1);

        let second = store
            .upsert_price(&IngestedRecord::new("Widget", 9.99), Utc::now())
            .await
            .unwrap();
        assert_eq!(second.price_change_count, 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_list_name_order_is_case_insensitive(pool: PgPool) {
        let store = PgProductStore::new(pool);
        for name in ["Banana", "apple", "Cherry"] {
            store
                .upsert_price(&IngestedRecord::new(name, 1.0), Utc::now())
                .await
                .unwrap();
        }

        let products = store.list(&params(SortField::Name, 1, 10)).await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Banana", "Cherry"]);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_list_page_past_end_is_empty(pool: PgPool) {
        let store = PgProductStore::new(pool);
        for name in ["a", "b", "c", "d", "e"] {
            store
                .upsert_price(&IngestedRecord::new(name, 1.0), Utc::now())
                .await
                .unwrap();
        }

        let third = store.list(&params(SortField::Name, 3, 2)).await.unwrap();
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].name, "e");
        assert!(store.list(&params(SortField::Name, 4, 2)).await.unwrap().is_empty());
    }
}
