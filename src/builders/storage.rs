use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::Result;

/// Keeps a copy of a file's original bytes while it is being overwritten.
pub trait BackupStore {
    /// Stores `original` for `file_path` and returns where it was written.
    fn store_backup(&mut self, file_path: &Path, original: &[u8]) -> Result<PathBuf>;
    /// Removes a backup once the overwrite has succeeded.
    fn discard(&mut self, backup_path: &Path) -> Result<()>;
    /// Puts a backup back in place of `file_path` after a failed overwrite.
    fn restore(&mut self, backup_path: &Path, file_path: &Path) -> Result<()>;
}

/// Writes each backup as a new file in the same directory as the source.
///
/// The backup is named after the source plus a random suffix and is created
/// exclusively, so an existing file is never overwritten. On Unix it gets
/// the same permissions as the source.
#[derive(Debug, Default)]
pub struct SiblingBackup;

impl SiblingBackup {
    pub fn new() -> Self {
        Self
    }
}

impl BackupStore for SiblingBackup {
    fn store_backup(&mut self, file_path: &Path, original: &[u8]) -> Result<PathBuf> {
        let dir = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = file_path
            .file_name()
            .map(|name| format!("{}.", name.to_string_lossy()))
            .unwrap_or_else(|| "backup.".to_string());

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".bak")
            .tempfile_in(&dir)?;
        let (mut file, backup_path) = temp.keep().map_err(|e| e.error)?;

        #[cfg(unix)]
        {
            let perms = fs::metadata(file_path)?.permissions();
            fs::set_permissions(&backup_path, perms)?;
        }

        file.write_all(original)?;
        file.sync_all()?;
        debug!(source = %file_path.display(), backup = %backup_path.display(), "stored backup");
        Ok(backup_path)
    }

    fn discard(&mut self, backup_path: &Path) -> Result<()> {
        fs::remove_file(backup_path)?;
        Ok(())
    }

    fn restore(&mut self, backup_path: &Path, file_path: &Path) -> Result<()> {
        fs::rename(backup_path, file_path)?;
        Ok(())
    }
}
