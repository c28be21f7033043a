//! Output path resolution and file writes for `save_file` requests.
//!
//! Base directory order: configured default dir (absolute and existing),
//! then `~/Desktop`, then `~`, then the working directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::Error;
use crate::config::AppConfig;

/// Resolves where rendered files land on disk.
#[derive(Debug, Clone, Default)]
pub struct OutputLocator {
    default_dir: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl OutputLocator {
    pub fn new(default_dir: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self { default_dir, home }
    }

    /// Build a locator from configuration and the current user's home directory.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.default_output_dir.clone(), dirs::home_dir())
    }

    /// Directory used for relative paths and generated file names.
    pub fn base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.default_dir
            && dir.is_absolute()
            && dir.is_dir()
        {
            return dir.clone();
        }

        match &self.home {
            Some(home) => {
                let desktop = home.join("Desktop");
                if desktop.is_dir() { desktop } else { home.clone() }
            }
            None => PathBuf::from("."),
        }
    }

    /// Resolve the destination for a rendered file.
    ///
    /// Absolute paths pass through unchanged, relative paths are joined under
    /// [`base_dir`](Self::base_dir), and a missing or blank path becomes
    /// `chart_<YYYYMMDDHHMMSS>.<extension>`.
    pub fn resolve(&self, output_path: Option<&str>, extension: &str, now: NaiveDateTime) -> PathBuf {
        match output_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => {
                let path = Path::new(path);
                if path.is_absolute() { path.to_path_buf() } else { self.base_dir().join(path) }
            }
            None => self.base_dir().join(timestamped_name(extension, now)),
        }
    }
}

/// `chart_<YYYYMMDDHHMMSS>.<extension>`
pub fn timestamped_name(extension: &str, now: NaiveDateTime) -> String {
    format!("chart_{}.{}", now.format("%Y%m%d%H%M%S"), extension)
}

/// Write UTF-8 text, creating parent directories if missing.
pub async fn write_text(path: &Path, text: &str) -> Result<(), Error> {
    write_bytes(path, text.as_bytes()).await
}

/// Write raw bytes, creating parent directories if missing.
pub async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::SaveFailed(format!("cannot create {}: {}", parent.display(), e)))?;
    }

    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| Error::SaveFailed(format!("cannot write {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output file");

    Ok(())
}
