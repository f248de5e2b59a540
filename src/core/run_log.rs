use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// Append-only run log, one `[<timestamp>] <event>` line per event.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, event: &str) -> Result<()> {
        let line = format_line(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true), event);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open log file: {}", self.path.display()))?;

        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write log file: {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}

fn format_line(timestamp: &str, event: &str) -> String {
    format!("[{}] {}\n", timestamp, event)
}
