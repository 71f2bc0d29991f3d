use crate::store::{ConfigStore, Query, Statement};
use crate::{ConfigForm, ConfigRecord, CoreError, DirectoryKey};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Domain-level operations on the singleton configuration.
///
/// The service is the only writer: it owns the defaults, validation and the
/// directory layout, and talks to whatever [`ConfigStore`] it was given.
#[derive(Clone)]
pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Initializes the store's schema, then wraps it.
    pub async fn open(store: Arc<dyn ConfigStore>) -> Result<Self, CoreError> {
        store.initialize().await?;
        Ok(Self::new(store))
    }

    pub async fn exists(&self) -> Result<bool, CoreError> {
        Ok(self.store.count(Query::Singleton).await? > 0)
    }

    /// The persisted record, or the defaults when nothing has been saved yet.
    pub async fn load(&self) -> Result<ConfigRecord, CoreError> {
        Ok(self
            .store
            .fetch_one(Query::Singleton)
            .await?
            .unwrap_or_default())
    }

    pub async fn save(&self, candidate: &ConfigRecord) -> Result<ConfigRecord, CoreError> {
        candidate.validate()?;
        provision_directories(candidate)?;

        let statement = if self.exists().await? {
            Statement::Update(candidate.clone())
        } else {
            Statement::Insert(candidate.clone())
        };
        let affected = self.store.execute(statement).await?;
        if affected == 0 {
            // Row vanished between the existence check and the update.
            self.store.execute(Statement::Insert(candidate.clone())).await?;
        }

        let saved = self
            .store
            .fetch_one(Query::Singleton)
            .await?
            .ok_or_else(|| CoreError::storage("read back config", "record missing after save"))?;
        info!(root = %saved.root_directory, theme = %saved.theme, "configuration saved");
        Ok(saved)
    }

    pub async fn save_form(&self, form: &ConfigForm) -> Result<ConfigRecord, CoreError> {
        let record = form.into_record()?;
        self.save(&record).await
    }

    pub fn resolve_path(record: &ConfigRecord, key: DirectoryKey) -> PathBuf {
        record.resolve(key)
    }
}

/// Creates the root and every subdirectory. Existing directories are fine.
pub fn provision_directories(record: &ConfigRecord) -> Result<(), CoreError> {
    for dir in record.directories() {
        create_dir(&dir)?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), CoreError> {
    debug!(path = %path.display(), "provisioning directory");
    fs::create_dir_all(path).map_err(|source| CoreError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use tempfile::TempDir;

    fn service() -> ConfigService {
        ConfigService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn provisioning_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let record = ConfigRecord::new(tmp.path().join("msx").to_string_lossy());
        provision_directories(&record).unwrap();
        provision_directories(&record).unwrap();
        for dir in record.directories() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
    }

    #[test]
    fn provisioning_fails_when_root_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("occupied");
        fs::write(&file, b"x").unwrap();
        let record = ConfigRecord::new(file.to_string_lossy());
        let err = provision_directories(&record).unwrap_err();
        assert!(matches!(err, CoreError::Filesystem { .. }));
    }

    #[tokio::test]
    async fn validation_runs_before_any_io() {
        let tmp = TempDir::new().unwrap();
        let mut record = ConfigRecord::new("");
        record.work_directory = tmp.path().join("never").to_string_lossy().into_owned();
        let err = service().save(&record).await.unwrap_err();
        assert!(err.is_validation());
        assert!(!tmp.path().join("never").exists());
    }
}
