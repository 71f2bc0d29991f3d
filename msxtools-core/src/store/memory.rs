use crate::store::{ConfigStore, Query, Statement};
use crate::{ConfigRecord, CoreError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    config: RwLock<Option<ConfigRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn initialize(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn count(&self, _query: Query) -> Result<u64, CoreError> {
        Ok(self.config.read().iter().count() as u64)
    }

    async fn fetch_one(&self, _query: Query) -> Result<Option<ConfigRecord>, CoreError> {
        Ok(self.config.read().clone())
    }

    async fn fetch_all(&self, _query: Query) -> Result<Vec<ConfigRecord>, CoreError> {
        Ok(self.config.read().iter().cloned().collect())
    }

    async fn execute(&self, statement: Statement) -> Result<u64, CoreError> {
        let now = Utc::now();
        let mut slot = self.config.write();
        match statement {
            Statement::Insert(mut record) => {
                record.created_at = slot.as_ref().and_then(|c| c.created_at).or(Some(now));
                record.updated_at = Some(now);
                *slot = Some(record);
                Ok(1)
            }
            Statement::Update(mut record) => {
                let Some(current) = slot.as_mut() else {
                    return Ok(0);
                };
                record.created_at = current.created_at;
                record.updated_at = Some(now);
                *current = record;
                Ok(1)
            }
        }
    }
}
