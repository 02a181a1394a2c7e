use std::path::{Path, PathBuf};

use crate::{Error, Result, info, types::Token};

/// File-backed token cache.
///
/// Pure local persistence: the file is written with owner-only permissions
/// and never touched over the network.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached token. A missing or unreadable file is a cache miss.
    pub async fn load(&self) -> Result<Token> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::TokenCacheMiss(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::TokenCacheMiss(format!("{}: {}", self.path.display(), e)))
    }

    pub async fn save(&self, token: &Token) -> Result<()> {
        info!("Saving credential file to: {}", self.path.display());

        let json = serde_json::to_string_pretty(token)?;
        self.write_private(json.as_bytes())
            .await
            .map_err(|source| Error::TokenSave {
                path: self.path.clone(),
                source,
            })
    }

    async fn write_private(&self, contents: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let mut options = async_fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use async_fs::unix::OpenOptionsExt;
            options.mode(0o600);
        }
        drop(options.open(&self.path).await?);

        // mode only applies on creation, so tighten files left by older runs
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            async_fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        async_fs::write(&self.path, contents).await
    }
}
