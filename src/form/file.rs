use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::FormSource;
use crate::error::{AppError, AppResult, TransportError};
use crate::models::RawAnswer;

/// Reads `{dir}/{key}.json` files holding the same answer array the form service returns.
#[derive(Debug, Clone)]
pub struct FileFormSource {
    dir: PathBuf,
}

impl FileFormSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(AppError::Transport(TransportError::Io(format!(
                "Invalid form key: {}",
                key
            ))));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl FormSource for FileFormSource {
    async fn fetch_answers(&self, key: &str) -> AppResult<Vec<RawAnswer>> {
        let path = self.path_for(key)?;
        let content = tokio::fs::read(&path).await.map_err(|e| {
            AppError::Transport(TransportError::Io(format!(
                "Failed to read form file {}: {}",
                path.display(),
                e
            )))
        })?;
        let answers: Vec<RawAnswer> = serde_json::from_slice(&content).map_err(AppError::decode)?;
        debug!(key, path = %path.display(), answers = answers.len(), "Loaded form answers");
        Ok(answers)
    }
}
