use msxtools_core::{
    store::memory::MemoryStore, ConfigForm, ConfigRecord, ConfigService, ConfigStore, DirectoryKey,
    Query, Statement, Theme,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

async fn fresh() -> (ConfigService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let svc = ConfigService::open(store.clone()).await.unwrap();
    (svc, store)
}

fn record_under(tmp: &TempDir) -> ConfigRecord {
    let mut r = ConfigRecord::new(tmp.path().join("msx").to_string_lossy());
    r.work_directory = "work".into();
    r.database_directory = "database".into();
    r.theme = Theme::Light;
    r
}

#[tokio::test]
async fn fresh_store_has_no_config_and_loads_defaults() {
    let (svc, _) = fresh().await;
    assert!(!svc.exists().await.unwrap());
    assert_eq!(svc.load().await.unwrap(), ConfigRecord::default());
}

#[tokio::test]
async fn loading_does_not_persist_defaults() {
    let (svc, store) = fresh().await;
    let _ = svc.load().await.unwrap();
    assert_eq!(store.count(Query::All).await.unwrap(), 0);
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let candidate = record_under(&tmp);

    let saved = svc.save(&candidate).await.unwrap();
    assert!(saved.created_at.is_some());
    assert!(svc.exists().await.unwrap());

    let loaded = svc.load().await.unwrap();
    assert!(loaded.same_settings(&candidate));
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn save_creates_every_directory() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let candidate = record_under(&tmp);
    svc.save(&candidate).await.unwrap();

    let root = tmp.path().join("msx");
    for sub in ["", "work", "temp", "download", "database"] {
        assert!(root.join(sub).is_dir(), "missing {sub}");
    }
}

#[tokio::test]
async fn repeated_save_only_advances_updated_at() {
    let tmp = TempDir::new().unwrap();
    let (svc, store) = fresh().await;
    let candidate = record_under(&tmp);

    let first = svc.save(&candidate).await.unwrap();
    let second = svc.save(&candidate).await.unwrap();

    assert!(second.same_settings(&first));
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(store.count(Query::All).await.unwrap(), 1);
}

#[tokio::test]
async fn empty_root_leaves_previous_record_untouched() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let good = svc.save(&record_under(&tmp)).await.unwrap();

    let mut bad = good.clone();
    bad.root_directory = String::new();
    bad.theme = Theme::System;
    assert!(svc.save(&bad).await.unwrap_err().is_validation());

    assert_eq!(svc.load().await.unwrap(), good);
}

#[tokio::test]
async fn unknown_theme_fails_validation() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let mut form = ConfigForm::from(&record_under(&tmp));
    form.theme = "neon".into();

    assert!(svc.save_form(&form).await.unwrap_err().is_validation());
    assert!(!svc.exists().await.unwrap());
    assert!(!tmp.path().join("msx").exists());
}

#[tokio::test]
async fn failed_provisioning_does_not_persist() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let blocker = tmp.path().join("file");
    std::fs::write(&blocker, b"").unwrap();

    let candidate = ConfigRecord::new(blocker.to_string_lossy());
    assert!(svc.save(&candidate).await.is_err());
    assert!(!svc.exists().await.unwrap());
}

#[tokio::test]
async fn racing_inserts_keep_a_single_record() {
    let tmp = TempDir::new().unwrap();
    let (svc, store) = fresh().await;
    let candidate = record_under(&tmp);

    // Simulate a writer that inserted after our existence check.
    store.execute(Statement::Insert(candidate.clone())).await.unwrap();
    store.execute(Statement::Insert(candidate.clone())).await.unwrap();
    svc.save(&candidate).await.unwrap();

    assert_eq!(store.fetch_all(Query::All).await.unwrap().len(), 1);
}

#[test]
fn resolve_path_joins_root() {
    let mut r = ConfigRecord::new("/data/msx");
    r.work_directory = "work".into();
    assert_eq!(
        ConfigService::resolve_path(&r, DirectoryKey::Work),
        PathBuf::from("/data/msx/work")
    );
}

#[tokio::test]
async fn subdirectory_escaping_root_is_rejected_without_io() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let mut candidate = record_under(&tmp);
    candidate.temp_directory = "../outside".into();

    assert!(svc.save(&candidate).await.unwrap_err().is_validation());
    assert!(!tmp.path().join("outside").exists());
    assert!(!tmp.path().join("msx").exists());
    assert!(!svc.exists().await.unwrap());
}

#[tokio::test]
async fn root_with_trailing_space_is_not_stored() {
    let tmp = TempDir::new().unwrap();
    let (svc, _) = fresh().await;
    let candidate = ConfigRecord::new(format!("{} ", tmp.path().join("msx").display()));

    assert!(svc.save(&candidate).await.unwrap_err().is_validation());
    assert!(!svc.exists().await.unwrap());

    // The form path trims before validating.
    let saved = svc.save_form(&ConfigForm::from(&candidate)).await.unwrap();
    assert_eq!(saved.root_directory, tmp.path().join("msx").display().to_string());
}
