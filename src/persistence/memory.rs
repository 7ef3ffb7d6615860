//! In-memory gateway
//!
//! Used for the default configuration and throughout the tests. Writes can
//! be made to fail on demand to exercise the engine's retry path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::PersistenceGateway;
use crate::utils::errors::{PersistenceError, PersistenceResult};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    values: RwLock<HashMap<String, Value>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a gateway with pre-existing documents
    pub fn with_values(values: HashMap<String, Value>) -> Self {
        Self {
            values: RwLock::new(values),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Read a stored document directly, bypassing the trait
    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.values.read().await.get(key).cloned()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn save(&self, key: &str, value: &Value) -> PersistenceResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(format!(
                "memory gateway rejected write to {}",
                key
            )));
        }

        self.values.write().await.insert(key.to_string(), value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(key = key, "Value stored in memory");
        Ok(())
    }

    async fn load(&self, key: &str) -> PersistenceResult<Option<Value>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
