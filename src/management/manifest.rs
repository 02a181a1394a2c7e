use std::path::{Path, PathBuf};

use crate::{Error, Result, types::MediaItem};

/// Writes the collected media items as a pretty-printed JSON array.
pub struct ManifestWriter {
    path: PathBuf,
}

impl ManifestWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates and rewrites the manifest. Encoding happens before the file
    /// is opened; an I/O failure midway may leave a truncated file behind.
    pub async fn write(&self, items: &[MediaItem]) -> Result<()> {
        let mut json = serde_json::to_string_pretty(items)?;
        json.push('\n');

        async_fs::write(&self.path, json)
            .await
            .map_err(|source| Error::ManifestWrite {
                path: self.path.clone(),
                source,
            })
    }

    pub async fn load(&self) -> Result<Vec<MediaItem>> {
        let read_err = |reason: String| Error::ManifestRead {
            path: self.path.clone(),
            reason,
        };
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| read_err(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| read_err(e.to_string()))
    }
}
