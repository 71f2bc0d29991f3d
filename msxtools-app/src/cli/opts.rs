use clap::{Args, Parser, Subcommand, ValueEnum};
use msxtools_core::DirectoryKey;
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Sqlite,
    Json,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "msxtools", version, about = "MSX Tools configuration frontend")]
pub struct Cli {
    /// Storage backend for the configuration record
    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite, global = true)]
    pub store: StoreKind,

    /// Store file path (defaults to the app data dir)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Defaults to `tui`
    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Launch the terminal UI
    Tui(TuiCmd),
    /// Print the active configuration
    Show,
    /// Save a configuration without the UI
    Set(SetCmd),
    /// Print the absolute path of a configured directory
    Path { key: DirectoryKey },
    /// Write the configuration to a JSON file
    Export { path: PathBuf },
    /// Save the configuration from a JSON file
    Import { path: PathBuf },
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiCmd {
    /// Skip the splash screen
    #[arg(long)]
    pub no_splash: bool,
}

/// Unset fields keep their currently loaded value.
#[derive(Debug, Args, Clone)]
pub struct SetCmd {
    #[arg(long)]
    pub root: Option<String>,
    #[arg(long)]
    pub work: Option<String>,
    #[arg(long)]
    pub temp: Option<String>,
    #[arg(long)]
    pub download: Option<String>,
    #[arg(long)]
    pub database: Option<String>,
    /// dark, light or system
    #[arg(long)]
    pub theme: Option<String>,
}
