use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "msxtools", "MSXTools") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn default_sqlite_file() -> PathBuf {
    data_root().join("msx_config.db")
}

pub fn default_json_file() -> PathBuf {
    data_root().join("msx_config.json")
}

pub fn log_file() -> PathBuf {
    data_root().join("msxtools.log")
}
