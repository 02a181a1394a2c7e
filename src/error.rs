use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors surfaced by any stage of a run.
///
/// `TokenCacheMiss` is recoverable: the authorization flow reacts to it by
/// starting the interactive consent. Every other variant ends the run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("client credentials not found at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("client credentials at {} are malformed: {reason}", path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    #[error("no usable cached token: {0}")]
    TokenCacheMiss(String),

    #[error("unable to cache oauth token at {}: {source}", path.display())]
    TokenSave {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to retrieve token from web: {0}")]
    TokenExchange(String),

    #[error("unable to refresh access token: {0}")]
    TokenRefresh(String),

    #[error("timed out after {}s waiting for the authorization callback", .0.as_secs())]
    AuthTimeout(Duration),

    #[error("authorization was denied: {0}")]
    AuthDenied(String),

    #[error("callback listener failed: {0}")]
    CallbackListener(String),

    #[error("error listing media items: {0}")]
    Listing(String),

    #[error("listing aborted after {pages} pages without a terminal cursor")]
    ListingLoopSuspected { pages: usize },

    #[error("error writing manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error encoding media items to JSON: {0}")]
    ManifestEncode(#[from] serde_json::Error),

    #[error("error reading manifest {}: {reason}", path.display())]
    ManifestRead { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
