use chrono::{DateTime, Utc};
use msxtools_core::{
    store::{ConfigStore, Query, Statement},
    ConfigRecord, CoreError, SINGLETON_ID,
};
use sqlx::{
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, Sqlite, SqlitePool,
};
use std::path::Path;
use tracing::info;

const COLUMNS: &str = "root_directory,work_directory,temp_directory,download_directory,\
                       database_directory,theme,created_at,updated_at";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and ensures the schema.
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CoreError::Filesystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|e| CoreError::storage("sqlite connect", e))?;
        let store = Self { pool };
        store.initialize().await?;
        info!(path = %path.display(), "sqlite config store opened");
        Ok(store)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| CoreError::storage("sqlite connect", e))?;
        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl ConfigStore for SqliteStore {
    async fn initialize(&self) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS config (
              id                  INTEGER PRIMARY KEY CHECK (id = 1),
              root_directory      TEXT NOT NULL,
              work_directory      TEXT NOT NULL,
              temp_directory      TEXT NOT NULL,
              download_directory  TEXT NOT NULL,
              theme               TEXT NOT NULL CHECK (theme IN ('dark','light','system')),
              database_directory  TEXT NOT NULL,
              created_at          TEXT NOT NULL,
              updated_at          TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CoreError::storage("sqlite schema", e))?;
        Ok(())
    }

    async fn count(&self, query: Query) -> Result<u64, CoreError> {
        let sql = format!("SELECT COUNT(*) AS count FROM config{}", filter(query));
        let row = bind_filter(sqlx::query(&sql), query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CoreError::storage("count config", e))?;
        Ok(row.get::<i64, _>("count") as u64)
    }

    async fn fetch_one(&self, query: Query) -> Result<Option<ConfigRecord>, CoreError> {
        let sql = select_sql(query);
        let row = bind_filter(sqlx::query(&sql), query)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::storage("read config", e))?;
        row.map(row_into_record).transpose()
    }

    async fn fetch_all(&self, query: Query) -> Result<Vec<ConfigRecord>, CoreError> {
        let sql = select_sql(query);
        let rows = bind_filter(sqlx::query(&sql), query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::storage("list config", e))?;
        rows.into_iter().map(row_into_record).collect()
    }

    async fn execute(&self, statement: Statement) -> Result<u64, CoreError> {
        let now = dt_to_str(Utc::now());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CoreError::storage("tx", e))?;

        let res = match &statement {
            Statement::Insert(c) => sqlx::query(
                r#"
                INSERT INTO config (
                  id, root_directory, work_directory, temp_directory,
                  download_directory, theme, database_directory, created_at, updated_at
                )
                VALUES (?,?,?,?,?,?,?,?,?)
                ON CONFLICT(id) DO UPDATE SET
                  root_directory=excluded.root_directory,
                  work_directory=excluded.work_directory,
                  temp_directory=excluded.temp_directory,
                  download_directory=excluded.download_directory,
                  theme=excluded.theme,
                  database_directory=excluded.database_directory,
                  updated_at=excluded.updated_at
                "#,
            )
            .bind(SINGLETON_ID)
            .bind(&c.root_directory)
            .bind(&c.work_directory)
            .bind(&c.temp_directory)
            .bind(&c.download_directory)
            .bind(c.theme.as_str())
            .bind(&c.database_directory)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::storage("insert config", e))?,
            Statement::Update(c) => sqlx::query(
                r#"
                UPDATE config SET
                  root_directory=?, work_directory=?, temp_directory=?,
                  download_directory=?, theme=?, database_directory=?, updated_at=?
                WHERE id=?
                "#,
            )
            .bind(&c.root_directory)
            .bind(&c.work_directory)
            .bind(&c.temp_directory)
            .bind(&c.download_directory)
            .bind(c.theme.as_str())
            .bind(&c.database_directory)
            .bind(&now)
            .bind(SINGLETON_ID)
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::storage("update config", e))?,
        };

        tx.commit()
            .await
            .map_err(|e| CoreError::storage("tx commit", e))?;
        Ok(res.rows_affected())
    }
}

// ===== Helpers =====
type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn filter(query: Query) -> &'static str {
    match query {
        Query::Singleton => " WHERE id = ?",
        Query::All => "",
    }
}

fn bind_filter(q: SqliteQuery<'_>, query: Query) -> SqliteQuery<'_> {
    match query {
        Query::Singleton => q.bind(SINGLETON_ID),
        Query::All => q,
    }
}

fn select_sql(query: Query) -> String {
    format!("SELECT {COLUMNS} FROM config{} ORDER BY id ASC", filter(query))
}

fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn dt_from_str(s: String) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(&s)
        .map_err(|e| CoreError::storage("decode timestamp", e))
        .map(|dt| dt.with_timezone(&Utc))
}

fn row_into_record(row: SqliteRow) -> Result<ConfigRecord, CoreError> {
    let theme: String = row.get("theme");
    Ok(ConfigRecord {
        root_directory: row.get("root_directory"),
        work_directory: row.get("work_directory"),
        temp_directory: row.get("temp_directory"),
        download_directory: row.get("download_directory"),
        database_directory: row.get("database_directory"),
        theme: theme
            .parse()
            .map_err(|e| CoreError::storage("decode theme", e))?,
        created_at: Some(dt_from_str(row.get("created_at"))?),
        updated_at: Some(dt_from_str(row.get("updated_at"))?),
    })
}
