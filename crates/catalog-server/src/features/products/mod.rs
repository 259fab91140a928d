//! Products feature
//!
//! - `POST /api/v1/products/fetch` - Ingest a price feed
//! - `GET /api/v1/products` - List products, sorted and paginated

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{FetchProductsCommand, FetchProductsError, FetchProductsResponse};
pub use queries::{ListProductsError, ListProductsQuery};
pub use routes::products_routes;
