//! # API Module
//!
//! HTTP handlers served by the transient local listener during the OAuth
//! authorization-code flow.
//!
//! - [`callback`] - Receives the browser redirect from Google's authorization
//!   server, checks the `state` parameter and forwards the authorization code
//!   (or the denial) to the waiting flow through a one-shot channel.
//!
//! The handler answers with a short plain-text body the user sees in the
//! browser tab.
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use gphotos_manifest::api::{callback, CallbackState};
//!
//! let app = Router::new()
//!     .route("/auth/google/callback", get(callback))
//!     .layer(Extension(state));
//! ```

mod callback;

pub use callback::{CallbackState, DENIED_BODY, SUCCESS_BODY, callback};
