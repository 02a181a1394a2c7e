use std::future::Future;

use reqwest::Client;

use crate::{
    Error, Result,
    management::TokenManager,
    types::{MediaItemsResponse, Page, PageCursor},
};

/// A cursor-paginated listing of media items.
pub trait MediaItemsSource {
    /// Fetches one page. An empty `cursor` asks for the first page.
    fn list_page(
        &mut self,
        page_size: u32,
        cursor: &PageCursor,
    ) -> impl Future<Output = Result<Page>> + Send;
}

/// Photos Library API client for `GET /mediaItems`.
pub struct PhotosClient {
    http: Client,
    api_url: String,
    tokens: TokenManager,
}

impl PhotosClient {
    pub fn new(http: Client, api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }
}

impl MediaItemsSource for PhotosClient {
    async fn list_page(&mut self, page_size: u32, cursor: &PageCursor) -> Result<Page> {
        let token = self.tokens.get_valid_token().await?;

        let mut req = self
            .http
            .get(format!("{}/mediaItems", self.api_url))
            .bearer_auth(token)
            .query(&[("pageSize", page_size)]);
        if !cursor.is_terminal() {
            req = req.query(&[("pageToken", cursor.as_str())]);
        }

        let res = req
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| Error::Listing(e.to_string()))?;
        let body = res
            .json::<MediaItemsResponse>()
            .await
            .map_err(|e| Error::Listing(e.to_string()))?;

        Ok(Page::from(body))
    }
}
