//! # CLI Module
//!
//! Command-level entry points used by the binary.
//!
//! - [`run`] - The complete run: load the client descriptor, authenticate
//!   (cached token, refresh, or interactive consent), fetch every media item
//!   and write the manifest.
//! - [`export_manifest`] - Fetch then write, used by [`run`] once a listing
//!   source is authenticated.
//! - [`is_version_request`] / [`print_version`] - The `version` shortcut,
//!   which never touches configuration, files or the network.
//!
//! ```text
//! Credential Loader ─▶ Token Store ─▶ Authorization Flow ─▶ Fetch Engine ─▶ Manifest Writer
//! ```

mod run;
mod version;

pub use run::export_manifest;
pub use run::run;
pub use version::{BuildInfo, is_version_request, print_version};
