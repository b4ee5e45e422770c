use std::sync::Arc;

use tracing::info;

use crate::config::{StoreConfig, StoreType};
use crate::errors::Result;

pub mod memory;
pub mod models;
pub mod redis;
pub mod traits;

pub use memory::MemoryStore;
pub use models::{GeoRecord, RefreshResult};
pub use self::redis::RedisStore;
pub use traits::{KvStore, LAST_UPDATE_KEY, RECORD_KEY_PREFIX, record_key};

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
        let store: Arc<dyn KvStore> = match config.store_type {
            StoreType::Memory => Arc::new(MemoryStore::new()),
            StoreType::Redis => Arc::new(RedisStore::connect(&config.redis).await?),
        };
        info!("Using key-value store backend: {}", store.backend_name());
        Ok(store)
    }
}
