use msxtools_core::{
    store::{ConfigStore, Query, Statement},
    ConfigRecord, ConfigService, Theme,
};
use msxtools_sqlite::SqliteStore;
use std::sync::Arc;
use tempfile::TempDir;

fn record_under(tmp: &TempDir) -> ConfigRecord {
    let mut r = ConfigRecord::new(tmp.path().join("msx").to_string_lossy());
    r.database_directory = "database".into();
    r.theme = Theme::System;
    r
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let store = SqliteStore::open_memory().await.unwrap();
    store.initialize().await.unwrap();
    store.initialize().await.unwrap();
    assert_eq!(store.count(Query::Singleton).await.unwrap(), 0);
    assert!(store.fetch_one(Query::Singleton).await.unwrap().is_none());
    assert!(store.fetch_all(Query::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_without_row_affects_nothing() {
    let store = SqliteStore::open_memory().await.unwrap();
    let n = store
        .execute(Statement::Update(ConfigRecord::new("/data/msx")))
        .await
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn insert_twice_keeps_one_row_and_created_at() {
    let store = SqliteStore::open_memory().await.unwrap();
    let mut r = ConfigRecord::new("/data/msx");
    store.execute(Statement::Insert(r.clone())).await.unwrap();
    let first = store.fetch_one(Query::Singleton).await.unwrap().unwrap();

    r.theme = Theme::Light;
    store.execute(Statement::Insert(r)).await.unwrap();
    let all = store.fetch_all(Query::All).await.unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0].theme, Theme::Light);
    assert_eq!(all[0].created_at, first.created_at);
}

#[tokio::test]
async fn update_refreshes_updated_at_only() {
    let store = SqliteStore::open_memory().await.unwrap();
    let mut r = ConfigRecord::new("/data/msx");
    store.execute(Statement::Insert(r.clone())).await.unwrap();
    let before = store.fetch_one(Query::Singleton).await.unwrap().unwrap();

    r.work_directory = "projects".into();
    assert_eq!(store.execute(Statement::Update(r)).await.unwrap(), 1);
    let after = store.fetch_one(Query::Singleton).await.unwrap().unwrap();

    assert_eq!(after.work_directory, "projects");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn service_round_trip_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("state").join("msx_config.db");
    let candidate = record_under(&tmp);

    {
        let store = Arc::new(SqliteStore::open_file(&db).await.unwrap());
        let svc = ConfigService::open(store.clone()).await.unwrap();
        assert!(!svc.exists().await.unwrap());
        assert_eq!(svc.load().await.unwrap(), ConfigRecord::default());
        svc.save(&candidate).await.unwrap();
        store.close().await;
    }

    let store = Arc::new(SqliteStore::open_file(&db).await.unwrap());
    let svc = ConfigService::open(store).await.unwrap();
    assert!(svc.exists().await.unwrap());
    assert!(svc.load().await.unwrap().same_settings(&candidate));
    for dir in candidate.directories() {
        assert!(dir.is_dir());
    }
}

#[tokio::test]
async fn invalid_save_keeps_stored_record() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open_memory().await.unwrap());
    let svc = ConfigService::open(store.clone()).await.unwrap();
    let saved = svc.save(&record_under(&tmp)).await.unwrap();

    let mut bad = saved.clone();
    bad.root_directory = "  ".into();
    assert!(svc.save(&bad).await.is_err());

    assert_eq!(svc.load().await.unwrap(), saved);
    assert_eq!(store.count(Query::All).await.unwrap(), 1);
}

#[tokio::test]
async fn failed_update_leaves_prior_record() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("msx_config.db");
    let store = SqliteStore::open_file(&db).await.unwrap();
    let original = ConfigRecord::new("/data/msx");
    store.execute(Statement::Insert(original.clone())).await.unwrap();
    let before = store.fetch_one(Query::Singleton).await.unwrap().unwrap();

    // A second connection installs a trigger that aborts every update after it has run.
    let other = sqlx::SqlitePool::connect_with(
        sqlx::sqlite::SqliteConnectOptions::new().filename(&db),
    )
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER config_locked AFTER UPDATE ON config \
         BEGIN SELECT RAISE(ABORT, 'config is locked'); END",
    )
    .execute(&other)
    .await
    .unwrap();
    other.close().await;

    let mut next = original.clone();
    next.root_directory = "/data/other".into();
    next.theme = Theme::Light;
    let err = store.execute(Statement::Update(next)).await.unwrap_err();
    assert!(matches!(err, msxtools_core::CoreError::Storage { .. }));

    let after = store.fetch_one(Query::Singleton).await.unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(store.count(Query::All).await.unwrap(), 1);
}
