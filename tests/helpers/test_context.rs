//! Test context for unified test setup

use std::sync::Arc;

use campus_hub::config::{Settings, StorageBackend};
use campus_hub::persistence::{FileGateway, MemoryGateway, PersistenceGateway};
use campus_hub::CampusHub;
use tempfile::TempDir;

/// Initialize test logging once per process
pub fn init_test_env() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("campus_hub=debug")
        .with_test_writer()
        .try_init();
}

/// Settings for tests: memory backend and a small capacity ceiling
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.storage.backend = StorageBackend::Memory;
    settings.events.max_capacity = 500;
    settings
}

/// A hub over a memory gateway the test can inspect and reopen
pub struct TestContext {
    pub hub: CampusHub,
    pub gateway: Arc<MemoryGateway>,
    pub settings: Settings,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_gateway(Arc::new(MemoryGateway::new())).await
    }

    /// Open a hub on a pre-seeded gateway
    pub async fn with_gateway(gateway: Arc<MemoryGateway>) -> Self {
        init_test_env();
        let settings = test_settings();
        let shared: Arc<dyn PersistenceGateway> = gateway.clone();
        let hub = CampusHub::open_with_gateway(settings.clone(), shared)
            .await
            .expect("hub should open");
        Self { hub, gateway, settings }
    }

    /// Shut the hub down and open a fresh one over the same storage
    pub async fn reopen(self) -> Self {
        let gateway = self.gateway.clone();
        self.hub.shutdown().await.expect("shutdown should flush");
        Self::with_gateway(gateway).await
    }
}

/// A hub over a file gateway in a temporary directory
pub struct FileTestContext {
    pub hub: CampusHub,
    pub temp_dir: TempDir,
    pub settings: Settings,
}

impl FileTestContext {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        Self::open_in(temp_dir).await
    }

    async fn open_in(temp_dir: TempDir) -> Self {
        init_test_env();
        let mut settings = test_settings();
        settings.storage.backend = StorageBackend::File;
        settings.storage.data_dir = temp_dir.path().to_string_lossy().into_owned();

        let gateway: Arc<dyn PersistenceGateway> =
            Arc::new(FileGateway::new(temp_dir.path(), &settings.storage.key_prefix));
        let hub = CampusHub::open_with_gateway(settings.clone(), gateway)
            .await
            .expect("hub should open");
        Self { hub, temp_dir, settings }
    }

    pub async fn reopen(self) -> Self {
        self.hub.shutdown().await.expect("shutdown should flush");
        Self::open_in(self.temp_dir).await
    }
}
