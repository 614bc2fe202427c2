mod cache_store;
mod data_store;
mod errors;
mod types;

pub use cache_store::{CacheStore, InMemoryCacheStore, SharedCacheStore};
pub use data_store::connect_sqlite;
pub use errors::StorageError;
pub use types::CacheData;
