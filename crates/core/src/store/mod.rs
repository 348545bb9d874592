//! Record storage.
//!
//! [`PatientStore`] is the capability the patient service needs from persistence: insert, point
//! lookup, full scan, replace-by-id and delete-by-id. Each call is atomic for a single record;
//! nothing spans records, and there is no per-identifier locking between calls.
//!
//! Backends:
//! - [`MemoryStore`]: process-local map
//! - [`SqliteStore`]: relational storage through sqlx
//! - [`FileStore`]: one YAML document per patient in a sharded directory tree

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::record::PatientRecord;
use async_trait::async_trait;
use patreg_uuid::ShardableUuid;
use std::sync::Arc;

#[async_trait]
pub trait PatientStore: Send + Sync + std::fmt::Debug {
    /// Persists a new record. Fails with `StoreError::Duplicate` if the id is taken.
    async fn insert(&self, record: &PatientRecord) -> StoreResult<()>;

    /// Point lookup; `Ok(None)` when absent.
    async fn get(&self, id: &ShardableUuid) -> StoreResult<Option<PatientRecord>>;

    /// Every stored record, in no guaranteed order.
    async fn list(&self) -> StoreResult<Vec<PatientRecord>>;

    /// Replaces the stored record with the same id. Returns `false` if there is none.
    async fn update(&self, record: &PatientRecord) -> StoreResult<bool>;

    /// Deletes by id. Returns `false` if there was nothing to delete.
    async fn remove(&self, id: &ShardableUuid) -> StoreResult<bool>;
}

/// Opens the backend described by `cfg`.
pub async fn open_store(cfg: &StoreConfig) -> StoreResult<Arc<dyn PatientStore>> {
    let store: Arc<dyn PatientStore> = match cfg {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Sqlite { url } => Arc::new(SqliteStore::connect(url).await?),
        StoreConfig::File { root } => Arc::new(FileStore::open(root).await?),
    };
    tracing::info!("opened patient store {}", cfg);
    Ok(store)
}
