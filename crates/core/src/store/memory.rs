use async_trait::async_trait;
use patreg_uuid::ShardableUuid;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::record::PatientRecord;
use crate::store::PatientStore;

/// In-memory store. Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<ShardableUuid, PatientRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn insert(&self, record: &PatientRecord) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(record.id()) {
            return Err(StoreError::Duplicate(*record.id()));
        }
        records.insert(*record.id(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &ShardableUuid) -> StoreResult<Option<PatientRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<PatientRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn update(&self, record: &PatientRecord) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        match records.get_mut(record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: &ShardableUuid) -> StoreResult<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}
