use reqwest::{Client, Url};

use crate::{
    Error, Result,
    config::Settings,
    fetch::{self, FetchOptions},
    google::{AuthFlow, ConsentPrompt, MediaItemsSource, OAuthClient, PhotosClient},
    management::{ManifestWriter, TokenStore},
    success,
    types::ClientDescriptor,
    utils,
};

/// Runs the whole authenticate, fetch and write sequence and returns the
/// number of media items in the written manifest.
pub async fn run<P: ConsentPrompt>(settings: &Settings, prompt: &P) -> Result<usize> {
    let descriptor = ClientDescriptor::load(&settings.credentials_path).await?;
    let redirect_uri = Url::parse(&settings.callback_url).map_err(|e| {
        Error::CallbackListener(format!("invalid callback URL '{}': {}", settings.callback_url, e))
    })?;

    let http = Client::new();
    let oauth = OAuthClient::new(
        http.clone(),
        descriptor.with_redirect_uri(redirect_uri),
        settings.scope.clone(),
    );
    let store = TokenStore::new(settings.token_path.clone());

    let tokens = AuthFlow::new(oauth, store, prompt, settings.auth_timeout)
        .authenticate()
        .await?;

    let mut photos = PhotosClient::new(http, settings.photos_api_url.clone(), tokens);
    let options = FetchOptions {
        max_pages: settings.max_pages,
        ..FetchOptions::default()
    };
    let writer = ManifestWriter::new(settings.manifest_path.clone());

    export_manifest(&mut photos, &writer, &options).await
}

/// Fetches the complete listing and only then writes the manifest, so a
/// failed fetch leaves any existing manifest untouched.
pub async fn export_manifest<S: MediaItemsSource>(
    source: &mut S,
    writer: &ManifestWriter,
    options: &FetchOptions,
) -> Result<usize> {
    let pb = utils::spinner("fetching list of Google photos...");
    let fetched = fetch::fetch_all(source, options, &pb).await;
    pb.finish_and_clear();
    let fetched = fetched?;

    success!(
        "Fetched {} media items in {}",
        utils::format_count(fetched.items.len()),
        utils::format_duration(fetched.elapsed)
    );

    let pb = utils::spinner("Writing manifest...");
    let written = writer.write(&fetched.items).await;
    pb.finish_and_clear();
    written?;

    success!("Manifest written to {}", writer.path().display());
    Ok(fetched.items.len())
}
