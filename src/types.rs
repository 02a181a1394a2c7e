use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Seconds before the recorded expiry at which a token is treated as stale.
pub const EXPIRY_LEEWAY_SECS: i64 = 60;

/// OAuth client application as registered with Google.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDescriptor {
    pub client_id: String,
    pub client_secret: String,
    pub auth_endpoint: Url,
    pub token_endpoint: Url,
    pub redirect_uri: Url,
}

impl ClientDescriptor {
    pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
        self.redirect_uri = redirect_uri;
        self
    }
}

/// Cached OAuth credential.
///
/// The field names match the token files written by the Go `oauth2` package,
/// so caches from earlier tooling stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// A token without an expiry never goes stale.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_LEEWAY_SECS) > now,
            None => true,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Token endpoint response for both the code exchange and the refresh grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    pub fn into_token(self, obtained_at: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| obtained_at + Duration::seconds(secs)),
        }
    }
}

/// Opaque continuation token of the listing API. Empty marks the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn is_terminal(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Option<String>> for PageCursor {
    fn from(value: Option<String>) -> Self {
        Self(value.unwrap_or_default())
    }
}

impl From<&str> for PageCursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A media item as returned by the API. Only `id` is interpreted; every other
/// field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<MediaItem>,
    pub next: PageCursor,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsResponse {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<MediaItemsResponse> for Page {
    fn from(res: MediaItemsResponse) -> Self {
        Page {
            items: res.media_items,
            next: PageCursor::from(res.next_page_token),
        }
    }
}

/// Observable states of the authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    CheckCache,
    AwaitingUserConsent,
    ListeningForCallback,
    ExchangingCode,
    Authenticated,
    Failed,
}

/// What the callback listener hands to the waiting flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
}
