use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::CoreError;

/// Fixed identity of the one configuration row.
pub const SINGLETON_ID: i64 = 1;

pub const DEFAULT_WORK_DIR: &str = "work";
pub const DEFAULT_TEMP_DIR: &str = "temp";
pub const DEFAULT_DOWNLOAD_DIR: &str = "download";
pub const DEFAULT_DATABASE_DIR: &str = "data";

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::System => "system",
        }
    }

    pub fn next(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::System,
            Theme::System => Theme::Dark,
        }
    }

    pub fn prev(self) -> Theme {
        match self {
            Theme::Dark => Theme::System,
            Theme::Light => Theme::Dark,
            Theme::System => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "system" => Ok(Theme::System),
            other => Err(CoreError::validation(format!(
                "theme must be one of dark, light, system (got {other:?})"
            ))),
        }
    }
}

/// One of the four directories that live under the root.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryKey {
    Work,
    Temp,
    Download,
    Database,
}

impl DirectoryKey {
    /// Provisioning order.
    pub const ALL: [DirectoryKey; 4] = [
        DirectoryKey::Work,
        DirectoryKey::Temp,
        DirectoryKey::Download,
        DirectoryKey::Database,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            DirectoryKey::Work => "work_directory",
            DirectoryKey::Temp => "temp_directory",
            DirectoryKey::Download => "download_directory",
            DirectoryKey::Database => "database_directory",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DirectoryKey::Work => "Work",
            DirectoryKey::Temp => "Temporary",
            DirectoryKey::Download => "Download",
            DirectoryKey::Database => "Database",
        }
    }
}

impl fmt::Display for DirectoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for DirectoryKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let short = key.strip_suffix("_directory").unwrap_or(&key);
        match short {
            "work" => Ok(DirectoryKey::Work),
            "temp" => Ok(DirectoryKey::Temp),
            "download" => Ok(DirectoryKey::Download),
            "database" => Ok(DirectoryKey::Database),
            _ => Err(CoreError::validation(format!("unknown directory key {s:?}"))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigRecord {
    pub root_directory: String,
    pub work_directory: String,
    pub temp_directory: String,
    pub download_directory: String,
    pub database_directory: String,
    pub theme: Theme,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self::new(default_root_directory())
    }
}

impl ConfigRecord {
    /// A record with the default subdirectories and theme under `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root_directory: root.into(),
            work_directory: DEFAULT_WORK_DIR.to_string(),
            temp_directory: DEFAULT_TEMP_DIR.to_string(),
            download_directory: DEFAULT_DOWNLOAD_DIR.to_string(),
            database_directory: DEFAULT_DATABASE_DIR.to_string(),
            theme: Theme::default(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn directory(&self, key: DirectoryKey) -> &str {
        match key {
            DirectoryKey::Work => &self.work_directory,
            DirectoryKey::Temp => &self.temp_directory,
            DirectoryKey::Download => &self.download_directory,
            DirectoryKey::Database => &self.database_directory,
        }
    }

    pub fn root(&self) -> &Path {
        Path::new(&self.root_directory)
    }

    pub fn resolve(&self, key: DirectoryKey) -> PathBuf {
        self.root().join(self.directory(key))
    }

    /// Root first, then each subdirectory in provisioning order.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(1 + DirectoryKey::ALL.len());
        dirs.push(self.root().to_path_buf());
        dirs.extend(DirectoryKey::ALL.iter().map(|k| self.resolve(*k)));
        dirs
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.root_directory.trim().is_empty() {
            return Err(CoreError::validation("root directory is required"));
        }
        if self.root_directory.trim() != self.root_directory {
            return Err(CoreError::validation(
                "root directory must not start or end with whitespace",
            ));
        }
        for key in DirectoryKey::ALL {
            if !stays_under_root(self.directory(key)) {
                return Err(CoreError::validation(format!(
                    "{} must be relative to the root directory",
                    key.field_name()
                )));
            }
        }
        Ok(())
    }

    /// True when the six user-facing fields match, ignoring timestamps.
    pub fn same_settings(&self, other: &ConfigRecord) -> bool {
        self.root_directory == other.root_directory
            && self.work_directory == other.work_directory
            && self.temp_directory == other.temp_directory
            && self.download_directory == other.download_directory
            && self.database_directory == other.database_directory
            && self.theme == other.theme
    }

    pub fn is_persisted(&self) -> bool {
        self.created_at.is_some()
    }
}

/// Relative paths made of plain segments only; `..`, `/` and drive prefixes would leave the root.
fn stays_under_root(dir: &str) -> bool {
    Path::new(dir).components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

pub fn default_root_directory() -> String {
    if cfg!(windows) {
        return r"C:\msx".to_string();
    }
    match directories::BaseDirs::new() {
        Some(base) => base.home_dir().join("msx").to_string_lossy().into_owned(),
        None => PathBuf::from(".").join("msx").to_string_lossy().into_owned(),
    }
}

/// Raw field values as entered by the user.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigForm {
    pub root_directory: String,
    pub work_directory: String,
    pub temp_directory: String,
    pub download_directory: String,
    pub database_directory: String,
    pub theme: String,
}

impl ConfigForm {
    pub fn into_record(&self) -> Result<ConfigRecord, CoreError> {
        let record = ConfigRecord {
            root_directory: self.root_directory.trim().to_string(),
            work_directory: self.work_directory.trim().to_string(),
            temp_directory: self.temp_directory.trim().to_string(),
            download_directory: self.download_directory.trim().to_string(),
            database_directory: self.database_directory.trim().to_string(),
            theme: self.theme.parse()?,
            created_at: None,
            updated_at: None,
        };
        record.validate()?;
        Ok(record)
    }
}

impl From<&ConfigRecord> for ConfigForm {
    fn from(r: &ConfigRecord) -> Self {
        Self {
            root_directory: r.root_directory.clone(),
            work_directory: r.work_directory.clone(),
            temp_directory: r.temp_directory.clone(),
            download_directory: r.download_directory.clone(),
            database_directory: r.database_directory.clone(),
            theme: r.theme.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msx() -> ConfigRecord {
        ConfigRecord::new("/data/msx")
    }

    #[test]
    fn resolve_joins_root_and_relative_dir() {
        let r = msx();
        assert_eq!(r.resolve(DirectoryKey::Work), PathBuf::from("/data/msx/work"));
        assert_eq!(r.resolve(DirectoryKey::Database), PathBuf::from("/data/msx/data"));
    }

    #[test]
    fn directories_lists_root_first() {
        let dirs = msx().directories();
        assert_eq!(dirs.len(), 5);
        assert_eq!(dirs[0], PathBuf::from("/data/msx"));
        assert_eq!(dirs[1], PathBuf::from("/data/msx/work"));
        assert_eq!(dirs[4], PathBuf::from("/data/msx/data"));
    }

    #[test]
    fn theme_parsing() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" system ".parse::<Theme>().unwrap(), Theme::System);
        assert!("neon".parse::<Theme>().unwrap_err().is_validation());
    }

    #[test]
    fn theme_cycles_through_all_values() {
        for t in Theme::ALL {
            assert_eq!(t.next().prev(), t);
        }
        assert_eq!(Theme::System.next(), Theme::Dark);
    }

    #[test]
    fn theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
    }

    #[test]
    fn directory_key_accepts_short_and_field_names() {
        assert_eq!("work".parse::<DirectoryKey>().unwrap(), DirectoryKey::Work);
        assert_eq!(
            "download_directory".parse::<DirectoryKey>().unwrap(),
            DirectoryKey::Download
        );
        assert!("root".parse::<DirectoryKey>().is_err());
    }

    #[test]
    fn empty_root_is_rejected() {
        let r = ConfigRecord::new("   ");
        assert!(r.validate().unwrap_err().is_validation());
    }

    #[test]
    fn absolute_subdirectory_is_rejected() {
        let mut r = msx();
        r.temp_directory = msx().root_directory;
        assert!(r.validate().is_err());
    }

    #[test]
    fn parent_segments_in_subdirectory_are_rejected() {
        for bad in ["../outside", "work/../../outside", ".."] {
            let mut r = msx();
            r.download_directory = bad.into();
            assert!(r.validate().unwrap_err().is_validation(), "{bad} accepted");
        }
        let mut r = msx();
        r.work_directory = "./nested/work".into();
        assert!(r.validate().is_ok());
    }

    #[test]
    fn root_with_surrounding_whitespace_is_rejected() {
        let r = ConfigRecord::new("/data/msx ");
        assert!(r.validate().unwrap_err().is_validation());
        let r = ConfigRecord::new(" /data/msx");
        assert!(r.validate().is_err());
    }

    #[test]
    fn form_round_trips_through_record() {
        let r = msx();
        let form = ConfigForm::from(&r);
        assert_eq!(form.theme, "dark");
        assert!(form.into_record().unwrap().same_settings(&r));
    }

    #[test]
    fn form_with_unknown_theme_fails() {
        let mut form = ConfigForm::from(&msx());
        form.theme = "neon".into();
        assert!(form.into_record().unwrap_err().is_validation());
    }

    #[test]
    fn default_record_is_not_persisted() {
        let d = ConfigRecord::default();
        assert!(!d.is_persisted());
        assert_eq!(d.database_directory, "data");
        assert_eq!(d.theme, Theme::Dark);
        assert!(d.validate().is_ok());
    }
}
