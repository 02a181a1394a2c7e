//! Google Photos Manifest Library
//!
//! This library authorizes a single user against the Google Photos Library
//! API with the OAuth 2.0 authorization-code grant, caches the resulting
//! token locally and collects the complete media item listing into a JSON
//! manifest file.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the local OAuth callback listener
//! - `cli` - Run orchestration and version reporting
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Crate error type
//! - `fetch` - Cursor-based paginated fetch engine
//! - `google` - OAuth endpoints, authorization flow and Photos Library client
//! - `management` - Local persistence of credentials, tokens and manifests
//! - `server` - Lifecycle of the local OAuth callback listener
//! - `types` - Data structures shared across modules
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use gphotos_manifest::{cli, config, google::BrowserPrompt};
//!
//! #[tokio::main]
//! async fn main() -> gphotos_manifest::Result<()> {
//!     let settings = config::Settings::from_env();
//!     let prompt = BrowserPrompt::new(settings.open_browser);
//!     let count = cli::run(&settings, &prompt).await?;
//!     println!("{count} items");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod google;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue circle indicator.
///
/// Creates a formatted output line with a blue "o" indicator for general
/// information and status updates during application execution.
///
/// # Example
///
/// ```
/// info!("Visit the following URL to authorize access:");
/// info!("Saving credential file to: {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used to provide positive feedback when operations complete successfully.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// success!("Fetched {} media items", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only the binary's top level uses
/// this; library code returns [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("{}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues that users should notice but that do not
/// stop the run.
///
/// # Example
///
/// ```
/// warning!("Cached token could not be refreshed: {}", reason);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
