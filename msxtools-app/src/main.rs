mod cli;
pub mod tui;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use msxtools_json::paths;
use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::commands::{open_service, run_cli};
use cli::opts::{Cli, Command, TuiCmd};
use tui::{app::TuiApp, state::SPLASH_DURATION};

/// Logs go to a file so they never draw over the terminal UI. Level is overridden by `RUST_LOG`.
fn setup_logging() -> Result<()> {
    let path = paths::log_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    if let Err(e) = setup_logging() {
        eprintln!("warning: logging disabled: {e:#}");
    }
    info!(store = ?args.store, "msxtools starting");

    let cmd = args.cmd.clone().unwrap_or(Command::Tui(TuiCmd::default()));
    match cmd {
        // TUI drives the runtime from its own loop (no nested Tokio)
        Command::Tui(opts) => {
            let rt = Arc::new(Runtime::new()?);
            let service = rt.block_on(open_service(&args.store, args.db_path.clone()))?;
            let splash = if opts.no_splash { Duration::ZERO } else { SPLASH_DURATION };
            let mut app = TuiApp::new(service, rt, splash)?;
            app.run()
        }
        other => {
            let rt = Runtime::new()?;
            rt.block_on(async {
                let service = open_service(&args.store, args.db_path.clone()).await?;
                run_cli(service, other).await
            })
        }
    }
}
