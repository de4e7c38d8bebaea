//! Search services for the product catalog
//!
//! [`SearchService`] answers chat queries two ways: by attribute matching on
//! the interpreted constraints, or by nearest-neighbor lookup over
//! description embeddings.

pub mod response;
pub mod search_service;
pub mod store_loader;

pub use response::{
    format_products, ERROR_MESSAGE, NOT_UNDERSTOOD_MESSAGE, NO_PRODUCTS_MESSAGE,
};
pub use search_service::SearchService;
pub use store_loader::{load_into_store, LoadReport};
