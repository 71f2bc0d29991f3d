use chrono::Utc;
use msxtools_core::{
    store::{ConfigStore, Query, Statement},
    ConfigRecord, CoreError,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;
use tracing::debug;

pub mod paths;

const FILE_VERSION: u32 = 1;

#[derive(Clone, Default, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    config: Option<ConfigRecord>,
}

/// Keeps the singleton record in a single JSON file.
pub struct JsonStore {
    path: PathBuf,
    image: RwLock<FileImage>,
}

impl JsonStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let store = Self {
            path: path.into(),
            image: RwLock::new(FileImage::default()),
        };
        store.initialize().await?;
        Ok(store)
    }

    /// Writes `next` to disk, and only then makes it the live image.
    async fn commit(&self, next: FileImage) -> Result<(), CoreError> {
        let path = self.path.clone();
        let img = next.clone();
        task::spawn_blocking(move || write_atomic(&path, &img))
            .await
            .map_err(|e| CoreError::storage("json write", e))?
            .map_err(|e| CoreError::storage("json write", e))?;
        debug!(path = %self.path.display(), "config file written");
        *self.image.write() = next;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConfigStore for JsonStore {
    async fn initialize(&self) -> Result<(), CoreError> {
        let img = if self.path.exists() {
            let p = self.path.clone();
            task::spawn_blocking(move || read_image(&p))
                .await
                .map_err(|e| CoreError::storage("json read", e))
                .and_then(|r| r.map_err(|e| CoreError::storage("json read", e)))?
        } else {
            let img = FileImage {
                version: FILE_VERSION,
                config: None,
            };
            let p = self.path.clone();
            let empty = img.clone();
            task::spawn_blocking(move || write_atomic(&p, &empty))
                .await
                .map_err(|e| CoreError::storage("json init", e))?
                .map_err(|e| CoreError::storage("json init", e))?;
            img
        };
        *self.image.write() = img;
        Ok(())
    }

    async fn count(&self, _query: Query) -> Result<u64, CoreError> {
        Ok(self.image.read().config.iter().count() as u64)
    }

    async fn fetch_one(&self, _query: Query) -> Result<Option<ConfigRecord>, CoreError> {
        Ok(self.image.read().config.clone())
    }

    async fn fetch_all(&self, _query: Query) -> Result<Vec<ConfigRecord>, CoreError> {
        Ok(self.image.read().config.iter().cloned().collect())
    }

    async fn execute(&self, statement: Statement) -> Result<u64, CoreError> {
        let now = Some(Utc::now());
        let mut next = self.image.read().clone();
        match statement {
            Statement::Insert(mut record) => {
                record.created_at = next.config.as_ref().and_then(|c| c.created_at).or(now);
                record.updated_at = now;
                next.config = Some(record);
            }
            Statement::Update(mut record) => {
                let Some(current) = next.config.as_ref() else {
                    return Ok(0);
                };
                record.created_at = current.created_at;
                record.updated_at = now;
                next.config = Some(record);
            }
        }
        next.version = FILE_VERSION;
        self.commit(next).await?;
        Ok(1)
    }
}

fn read_image(path: &Path) -> Result<FileImage, std::io::Error> {
    let buf = fs::read_to_string(path)?;
    let img = serde_json::from_str::<FileImage>(&buf)?;
    Ok(img)
}

fn write_atomic(path: &Path, img: &FileImage) -> Result<(), std::io::Error> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_vec_pretty(img)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
