use crate::cli::opts::*;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use msxtools_core::{ConfigForm, ConfigRecord, ConfigService, ConfigStore, DirectoryKey};
use msxtools_json::{paths, JsonStore};
use msxtools_sqlite::SqliteStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Runs every non-interactive subcommand.
pub async fn run_cli(service: ConfigService, cmd: Command) -> Result<()> {
    match cmd {
        Command::Show => show_cmd(&service).await,
        Command::Set(cmd) => set_cmd(&service, cmd).await,
        Command::Path { key } => {
            let record = service.load().await?;
            println!("{}", ConfigService::resolve_path(&record, key).display());
            Ok(())
        }
        Command::Export { path } => {
            let record = service.load().await?;
            let s = serde_json::to_string_pretty(&ConfigForm::from(&record))?;
            std::fs::write(&path, s).with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        }
        Command::Import { path } => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let form: ConfigForm = serde_json::from_str(&data)?;
            let saved = service.save_form(&form).await?;
            println!("imported; root {}", saved.root_directory);
            Ok(())
        }
        // main routes the UI itself
        Command::Tui(_) => unreachable!(),
    }
}

pub async fn open_service(store: &StoreKind, db_path: Option<PathBuf>) -> Result<ConfigService> {
    let store: Arc<dyn ConfigStore> = match store {
        StoreKind::Sqlite => {
            let p = db_path.unwrap_or_else(paths::default_sqlite_file);
            Arc::new(SqliteStore::open_file(&p).await.with_context(|| format!("opening {}", p.display()))?)
        }
        StoreKind::Json => {
            let p = db_path.unwrap_or_else(paths::default_json_file);
            Arc::new(JsonStore::open(&p).await.with_context(|| format!("opening {}", p.display()))?)
        }
    };
    Ok(ConfigService::open(store).await?)
}

async fn show_cmd(service: &ConfigService) -> Result<()> {
    let record = service.load().await?;
    if service.exists().await? {
        println!("saved\t{}", local_time(record.updated_at));
    } else {
        println!("saved\tno (showing defaults)");
    }
    println!("root_directory\t{}", record.root_directory);
    for key in DirectoryKey::ALL {
        println!("{}\t{}\t{}", key, record.directory(key), record.resolve(key).display());
    }
    println!("theme\t{}", record.theme);
    Ok(())
}

async fn set_cmd(service: &ConfigService, cmd: SetCmd) -> Result<()> {
    let current = service.load().await?;
    let form = apply_overrides(&current, cmd);
    let saved = service.save_form(&form).await?;
    println!("saved; root {}", saved.root_directory);
    Ok(())
}

fn apply_overrides(current: &ConfigRecord, cmd: SetCmd) -> ConfigForm {
    let mut form = ConfigForm::from(current);
    if let Some(v) = cmd.root { form.root_directory = v; }
    if let Some(v) = cmd.work { form.work_directory = v; }
    if let Some(v) = cmd.temp { form.temp_directory = v; }
    if let Some(v) = cmd.download { form.download_directory = v; }
    if let Some(v) = cmd.database { form.database_directory = v; }
    if let Some(v) = cmd.theme { form.theme = v; }
    form
}

pub fn local_time(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
