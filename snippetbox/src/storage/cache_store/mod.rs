mod memory;
mod types;

pub use types::{CacheStore, InMemoryCacheStore, SharedCacheStore};
