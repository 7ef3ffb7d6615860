//! Persistence gateway
//!
//! The engine persists its snapshot as a handful of whole JSON documents,
//! one per key. Every save overwrites the previous value; there is no
//! partial merge.

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileGateway;
pub use memory::MemoryGateway;
pub use self::redis::RedisGateway;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::utils::errors::{PersistenceResult, Result};

/// Events collection
pub const EVENTS_KEY: &str = "CAMPUSHUB_EVENTS";
/// Registrations collection, removed records included
pub const REGISTRATIONS_KEY: &str = "CAMPUSHUB_REGISTRATIONS";
/// Per-student interested event ids
pub const INTERESTED_KEY: &str = "CAMPUSHUB_INTERESTED";
/// Signed-in user record
pub const CURRENT_USER_KEY: &str = "CAMPUSHUB_CURRENT_USER";
/// Student identity records the participant roster joins against
pub const STUDENTS_KEY: &str = "CAMPUSHUB_STUDENTS";

/// Opaque key to value storage
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Overwrite the value stored under `key`
    async fn save(&self, key: &str, value: &Value) -> PersistenceResult<()>;

    /// Load the value stored under `key`, `None` when absent
    async fn load(&self, key: &str) -> PersistenceResult<Option<Value>>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Create the gateway selected by the storage configuration
pub async fn build_gateway(config: &StorageConfig) -> Result<Arc<dyn PersistenceGateway>> {
    let gateway: Arc<dyn PersistenceGateway> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryGateway::new()),
        StorageBackend::File => Arc::new(FileGateway::new(&config.data_dir, &config.key_prefix)),
        StorageBackend::Redis => Arc::new(RedisGateway::new(config).await?),
    };

    info!(backend = gateway.backend(), "Persistence gateway ready");
    Ok(gateway)
}
