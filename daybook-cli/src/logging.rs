use anyhow::{Context, Result};
use directories::BaseDirs;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Matches both `daybook` and `daybook_core`.
const DEFAULT_FILTER: &str = "daybook=info";

/// `{data_dir}/daybook/daybook.log`
pub fn log_path() -> Option<PathBuf> {
    BaseDirs::new().map(|b| b.data_dir().join("daybook").join("daybook.log"))
}

/// Sends every `tracing` event to the log file at `path`.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating parent directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("installing the log subscriber")
}
