use crate::{
    Error, Result,
    google::OAuthClient,
    info,
    management::TokenStore,
    types::Token,
    warning,
};

/// Holds the current token together with what it takes to keep it fresh.
#[derive(Debug, Clone)]
pub struct TokenManager {
    token: Token,
    store: TokenStore,
    oauth: OAuthClient,
}

impl TokenManager {
    pub fn new(token: Token, store: TokenStore, oauth: OAuthClient) -> Self {
        TokenManager {
            token,
            store,
            oauth,
        }
    }

    /// Loads the cached token, refreshing and re-saving it when it is stale
    /// but refreshable.
    ///
    /// Every way of not ending up with a fresh token is a
    /// [`Error::TokenCacheMiss`].
    pub async fn load(store: TokenStore, oauth: OAuthClient) -> Result<Self> {
        let token = store.load().await?;
        let mut mgr = Self::new(token, store, oauth);

        if mgr.token.is_fresh() {
            return Ok(mgr);
        }
        if !mgr.token.can_refresh() {
            return Err(Error::TokenCacheMiss(
                "cached token expired and has no refresh token".to_string(),
            ));
        }

        info!("Cached token expired, refreshing...");
        mgr.refresh()
            .await
            .map_err(|e| Error::TokenCacheMiss(e.to_string()))?;
        Ok(mgr)
    }

    /// Returns an access token that is fresh at the time of the call.
    pub async fn get_valid_token(&mut self) -> Result<String> {
        if !self.token.is_fresh() {
            if !self.token.can_refresh() {
                return Err(Error::TokenRefresh(
                    "access token expired and has no refresh token".to_string(),
                ));
            }
            self.refresh().await?;
        }

        Ok(self.token.access_token.clone())
    }

    async fn refresh(&mut self) -> Result<()> {
        let refresh_token = self.token.refresh_token.clone().unwrap_or_default();
        self.token = self.oauth.refresh(&refresh_token).await?;

        // the refreshed token is usable for this run even if caching fails
        if let Err(e) = self.store.save(&self.token).await {
            warning!("{}", e);
        }
        Ok(())
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
