//! CLI utility helpers

use super::Cli;
use casegen::{Config, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve configuration: `--config`, else `./.casegen.yaml`, else defaults
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Ok(Config::load_from_dir(Path::new("."))?.unwrap_or_default()),
    }
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            tracing::info!(path = %p.display(), "report written");
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
