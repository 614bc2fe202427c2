use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

/// Cache store shared between requests. The mutex serializes every mutation.
pub type SharedCacheStore = Arc<Mutex<Box<dyn CacheStore>>>;

pub struct InMemoryCacheStore {
    pub(super) entry: HashMap<String, CacheData>,
}

#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Put a value into the store with a TTL in seconds.
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Get a value from the store. Expired values are removed and reported as absent.
    async fn get(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a value from the store.
    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError>;
}
