//! JSON file snapshot store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::check::CheckResult;

/// Snapshot error types.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Point-in-time copy of the last batch, overwritten on every save.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the snapshot with `results`.
    ///
    /// Written to a sibling temp file and renamed so readers never see a
    /// half-written snapshot.
    pub async fn save(&self, results: &[CheckResult]) -> Result<(), SnapshotError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let data = serde_json::to_vec_pretty(results)?;
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Wrote {} records to {}", results.len(), self.path.display());
        Ok(())
    }

    /// Read the last snapshot. A snapshot that was never written is empty.
    pub async fn load(&self) -> Result<Vec<CheckResult>, SnapshotError> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }
}
