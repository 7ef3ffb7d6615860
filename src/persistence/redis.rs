//! Redis gateway
//!
//! Stores each snapshot document as a JSON string under a prefixed key.
//! Unlike conversation state, snapshot documents never expire.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, error};

use super::PersistenceGateway;
use crate::config::StorageConfig;
use crate::utils::errors::{PersistenceError, PersistenceResult, Result};

/// Redis-backed snapshot storage
#[derive(Clone)]
pub struct RedisGateway {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    prefix: String,
}

impl RedisGateway {
    /// Connect to the configured Redis instance
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            prefix: config.key_prefix.clone(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        prefixed_key(&self.prefix, key)
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

#[async_trait]
impl PersistenceGateway for RedisGateway {
    async fn save(&self, key: &str, value: &Value) -> PersistenceResult<()> {
        let full_key = self.full_key(key);

        let serialized = serde_json::to_string(value).map_err(|source| PersistenceError::Serialization {
            key: key.to_string(),
            source,
        })?;

        let mut conn = self.connection_manager.clone();
        match conn.set::<_, _, ()>(&full_key, serialized).await {
            Ok(()) => {
                debug!(key = %full_key, "Value saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(key = %full_key, error = %e, "Failed to save value to Redis");
                Err(PersistenceError::Redis {
                    key: key.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn load(&self, key: &str) -> PersistenceResult<Option<Value>> {
        let full_key = self.full_key(key);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&full_key).await.map_err(|source| PersistenceError::Redis {
            key: key.to_string(),
            source,
        })?;

        match serialized {
            Some(data) => {
                let value = serde_json::from_str(&data).map_err(|source| PersistenceError::Serialization {
                    key: key.to_string(),
                    source,
                })?;
                debug!(key = %full_key, data_length = data.len(), "Value loaded from Redis");
                Ok(Some(value))
            }
            None => {
                debug!(key = %full_key, "No value found in Redis");
                Ok(None)
            }
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
