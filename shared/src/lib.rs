pub mod config;

use std::sync::Arc;

use sqlx::mysql::MySqlConnectOptions;
use todo_atoms::tasks::{MemoryTaskStore, MySqlTaskStore, TaskError, TaskStore};

pub use config::{Config, ConfigError, DatabaseConfig, StoreConfig};

/// Handles shared by every invocation. Built once in `main`, closed on shutdown.
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub config: Config,
}

impl AppState {
    /// Open the configured store
    pub async fn connect(config: Config) -> Result<Self, TaskError> {
        let store: Arc<dyn TaskStore> = match &config.store {
            StoreConfig::MySql(db) => {
                tracing::info!("Connecting to MySQL {}:{}/{}", db.host, db.port, db.name);
                Arc::new(MySqlTaskStore::connect(connect_options(db), db.max_connections).await?)
            }
            StoreConfig::Memory => {
                tracing::warn!("Using in-memory task store; tasks are lost on restart");
                Arc::new(MemoryTaskStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn TaskStore>) -> Self {
        Self { store, config }
    }

    /// Close the store. The Lambda binary calls this once its runtime loop
    /// ends or SIGTERM arrives; Lambda only delivers SIGTERM when an
    /// extension is registered, otherwise the sandbox is frozen and the pool
    /// is dropped with it.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

fn connect_options(db: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .database(&db.name)
        .username(&db.user)
        .password(&db.password)
}
