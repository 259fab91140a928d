pub mod fetch;

pub use fetch::{FetchProductsCommand, FetchProductsError, FetchProductsResponse};
