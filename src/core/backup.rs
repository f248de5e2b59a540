use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

/// Copy `file_path` to `<backup_dir>/<file name>.<unix millis>.bak`.
///
/// The backup directory is created if needed. Returns the backup path.
pub async fn backup_file(file_path: &Path, backup_dir: &Path) -> Result<PathBuf> {
    let file_name = file_path
        .file_name()
        .with_context(|| format!("Cannot back up {}: no file name", file_path.display()))?;

    let backup_path = backup_dir.join(format!(
        "{}.{}.bak",
        file_name.to_string_lossy(),
        chrono::Utc::now().timestamp_millis()
    ));

    fs::create_dir_all(backup_dir).await.with_context(|| {
        format!(
            "Failed to create backup directory: {}",
            backup_dir.display()
        )
    })?;

    fs::copy(file_path, &backup_path).await.with_context(|| {
        format!(
            "Failed to back up {} to {}",
            file_path.display(),
            backup_path.display()
        )
    })?;

    Ok(backup_path)
}
