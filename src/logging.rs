use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use env_logger::{Env, Target};
use log::info;

const LOG_FILE: &str = "educlimb.log";

pub fn log_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "educlimb")
        .ok_or_else(|| anyhow!("Could not determine project directory"))?;
    Ok(proj_dirs.data_dir().join(LOG_FILE))
}

/// Routes `log` records to a file, since the terminal belongs to the form.
/// `RUST_LOG` overrides the default `info` level.
pub fn init() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("Logger already initialized")?;

    info!("{} {} started", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Ok(path)
}
