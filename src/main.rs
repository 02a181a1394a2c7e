use std::path::PathBuf;

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use gphotos_manifest::{
    cli::{self, BuildInfo},
    config::{self, Settings},
    error,
    google::BrowserPrompt,
    success, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

/// Authorize with Google Photos and write a manifest of every media item.
///
/// Run `gphotos-manifest version` for build information.
#[derive(Parser, Debug, Clone)]
#[clap(
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  disable_version_flag = true,
  styles=styles(),
)]
struct Cli {
    /// OAuth client secret file (a leading ~ is expanded)
    #[clap(long, value_name = "PATH")]
    credentials: Option<String>,

    /// Token cache file
    #[clap(long, value_name = "PATH")]
    token_file: Option<PathBuf>,

    /// Manifest output file
    #[clap(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Redirect URI registered for the OAuth client; the listener binds to it
    #[clap(long, value_name = "URL")]
    callback_url: Option<String>,

    /// Seconds to wait for the authorization redirect, 0 waits forever
    #[clap(long, value_name = "SECS")]
    auth_timeout: Option<u64>,

    /// Abort the listing after this many pages
    #[clap(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Print the consent URL without opening a browser
    #[clap(long)]
    no_browser: bool,
}

impl Cli {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(path) = self.credentials {
            settings.credentials_path = path;
        }
        if let Some(path) = self.token_file {
            settings.token_path = path;
        }
        if let Some(path) = self.manifest {
            settings.manifest_path = path;
        }
        if let Some(url) = self.callback_url {
            settings.callback_url = url;
        }
        if let Some(secs) = self.auth_timeout {
            settings.auth_timeout = config::timeout_from_secs(secs);
        }
        if let Some(pages) = self.max_pages {
            settings.max_pages = pages;
        }
        settings.open_browser = !self.no_browser;
        settings
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if cli::is_version_request(&args) {
        cli::print_version(&BuildInfo::from_build_env());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let settings = Cli::parse_from(args).apply(Settings::from_env());
    let prompt = BrowserPrompt::new(settings.open_browser);

    match cli::run(&settings, &prompt).await {
        Ok(count) => success!(
            "Manifest created successfully with {} media items",
            gphotos_manifest::utils::format_count(count)
        ),
        Err(e) => error!("{}", e),
    }
}
