use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::{Error, Result, config, types::ClientDescriptor, utils};

/// Client secret file as downloaded from the Google Cloud console. Desktop
/// clients nest the fields under `installed`, web clients under `web`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: RawClient },
    Web { web: RawClient },
    Flat(RawClient),
}

#[derive(Debug, Deserialize)]
struct RawClient {
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl CredentialsFile {
    fn into_raw(self) -> RawClient {
        match self {
            CredentialsFile::Installed { installed } => installed,
            CredentialsFile::Web { web } => web,
            CredentialsFile::Flat(raw) => raw,
        }
    }
}

impl ClientDescriptor {
    /// Reads the client descriptor from `path`, expanding a leading `~`.
    pub async fn load(path: &str) -> Result<Self> {
        let path = utils::expand_home(path);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path });
            }
            Err(e) => {
                return Err(Error::ConfigMalformed {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        Self::parse(&content, &path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let malformed = |reason: String| Error::ConfigMalformed {
            path: PathBuf::from(path),
            reason,
        };

        let raw = serde_json::from_str::<CredentialsFile>(content)
            .map_err(|e| malformed(e.to_string()))?
            .into_raw();

        if raw.client_id.trim().is_empty() {
            return Err(malformed("client_id is empty".to_string()));
        }

        let parse_url = |field: &str, value: &str| {
            Url::parse(value).map_err(|e| malformed(format!("{field} '{value}': {e}")))
        };

        let auth_endpoint = parse_url(
            "auth_uri",
            raw.auth_uri.as_deref().unwrap_or(config::DEFAULT_AUTH_URL),
        )?;
        let token_endpoint = parse_url(
            "token_uri",
            raw.token_uri.as_deref().unwrap_or(config::DEFAULT_TOKEN_URL),
        )?;
        let redirect_uri = parse_url(
            "redirect_uris",
            raw.redirect_uris
                .first()
                .map(String::as_str)
                .unwrap_or(config::DEFAULT_CALLBACK_URL),
        )?;

        Ok(Self {
            client_id: raw.client_id,
            client_secret: raw.client_secret,
            auth_endpoint,
            token_endpoint,
            redirect_uri,
        })
    }
}
