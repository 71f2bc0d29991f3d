use crate::{ConfigRecord, CoreError};
use async_trait::async_trait;

pub mod memory;

/// Which records a read selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    Singleton,
    All,
}

/// A mutation, applied atomically by the store.
#[derive(Clone, Debug)]
pub enum Statement {
    /// Writes the singleton row, stamping both timestamps. If the row is
    /// already there it is updated instead of duplicated.
    Insert(ConfigRecord),
    /// Rewrites every field of an existing singleton and refreshes `updated_at`.
    Update(ConfigRecord),
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Creates the backing schema if it is missing. Idempotent.
    async fn initialize(&self) -> Result<(), CoreError>;

    async fn count(&self, query: Query) -> Result<u64, CoreError>;
    async fn fetch_one(&self, query: Query) -> Result<Option<ConfigRecord>, CoreError>;
    async fn fetch_all(&self, query: Query) -> Result<Vec<ConfigRecord>, CoreError>;

    /// Returns the number of affected records.
    async fn execute(&self, statement: Statement) -> Result<u64, CoreError>;
}
