// Persistence: preferred-directory save with unconditional download fallback.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::layout::RenderedChecklist;
use crate::AppError;

/// Where a checklist actually landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDestination {
    /// Written into the user-chosen directory.
    Directory(PathBuf),
    /// Fell through to download persistence.
    Download(PathBuf),
}

impl SaveDestination {
    pub fn path(&self) -> &Path {
        match self {
            SaveDestination::Directory(p) | SaveDestination::Download(p) => p,
        }
    }
}

/// Remembered save directory, kept across runs in a small JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavePrefs {
    pub save_dir: Option<PathBuf>,
}

impl SavePrefs {
    /// A missing or unreadable preference file degrades to "nothing
    /// remembered", never an error.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("ignoring corrupt preference file {}: {}", path.display(), e);
                SavePrefs::default()
            }),
            Err(_) => SavePrefs::default(),
        }
    }

    pub fn store(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(self)
            .map_err(|e| AppError::PrefsError(e.to_string()))?;
        fs::write(path, body)?;
        Ok(())
    }
}

/// Default preference file location under the platform config dir.
pub fn default_prefs_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("adr-checklist").join("config.json"))
}

/// Download persistence target: the platform downloads dir, else cwd.
pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Save a rendered checklist. The preferred directory is tried first; any
/// failure there logs a warning and falls through to the downloads
/// directory. Only a failure of the fallback write itself surfaces.
pub fn save_checklist(
    doc: &RenderedChecklist,
    filename: &str,
    preferred: Option<&Path>,
    downloads: &Path,
) -> Result<SaveDestination, AppError> {
    if let Some(dir) = preferred {
        match write_into(dir, filename, doc) {
            Ok(path) => return Ok(SaveDestination::Directory(path)),
            Err(e) => warn!(
                "save to {} failed, falling back to download: {}",
                dir.display(),
                e
            ),
        }
    }
    fs::create_dir_all(downloads)?;
    let path = downloads.join(filename);
    doc.write_to(&path)?;
    Ok(SaveDestination::Download(path))
}

/// Re-validate the directory before writing; a remembered path may have
/// vanished or lost write access since it was chosen.
fn write_into(dir: &Path, filename: &str, doc: &RenderedChecklist) -> io::Result<PathBuf> {
    let meta = fs::metadata(dir)?;
    if !meta.is_dir() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a directory"));
    }
    if meta.permissions().readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "directory is read-only",
        ));
    }
    let path = dir.join(filename);
    doc.write_to(&path)?;
    Ok(path)
}
