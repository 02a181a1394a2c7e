//! # Google Integration Module
//!
//! Remote collaborators of a run:
//!
//! - [`oauth`] - OAuth 2.0 endpoints of the registered client: consent URL
//!   construction, authorization-code exchange (with PKCE) and refresh.
//! - [`auth`] - The authorization flow controller, which reuses a cached
//!   token when possible and otherwise runs the interactive consent with a
//!   transient local callback listener.
//! - [`media_items`] - The Photos Library `mediaItems` listing, one page per
//!   call, behind the [`MediaItemsSource`] trait.
//!
//! All HTTP goes through a shared `reqwest::Client`. Nothing here retries;
//! a failed request ends the run.

pub mod auth;
pub mod media_items;
pub mod oauth;

pub use auth::{AuthFlow, BrowserPrompt, ConsentPrompt};
pub use media_items::{MediaItemsSource, PhotosClient};
pub use oauth::OAuthClient;
