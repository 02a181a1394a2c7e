use std::time::Duration;

use reqwest::Url;

use crate::{
    Error, Result,
    google::OAuthClient,
    info,
    management::{TokenManager, TokenStore},
    server::CallbackServer,
    success,
    types::{AuthState, CallbackOutcome},
    utils, warning,
};

/// Shows the consent URL to the operator.
pub trait ConsentPrompt {
    fn present(&self, auth_url: &Url);
}

/// Prints the consent URL and, unless disabled, opens it in the default browser.
pub struct BrowserPrompt {
    open_browser: bool,
}

impl BrowserPrompt {
    pub fn new(open_browser: bool) -> Self {
        Self { open_browser }
    }
}

impl ConsentPrompt for BrowserPrompt {
    fn present(&self, auth_url: &Url) {
        info!("Visit the URL for the auth dialog: {}", auth_url);
        if self.open_browser && webbrowser::open(auth_url.as_str()).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        }
    }
}

/// Drives the authorization flow from the token cache to an authenticated
/// [`TokenManager`].
///
/// ```text
/// CheckCache ──fresh or refreshed──────────────────────────────▶ Authenticated
///     │
///     └─miss─▶ AwaitingUserConsent ─▶ ListeningForCallback ─▶ ExchangingCode ─▶ Authenticated
///                                             (any error) ─▶ Failed
/// ```
///
/// The callback listener is bound before the consent URL is shown, so a fast
/// redirect never reaches a closed port.
pub struct AuthFlow<'a, P: ConsentPrompt> {
    oauth: OAuthClient,
    store: TokenStore,
    prompt: &'a P,
    timeout: Option<Duration>,
    transitions: Vec<AuthState>,
}

impl<'a, P: ConsentPrompt> AuthFlow<'a, P> {
    pub fn new(
        oauth: OAuthClient,
        store: TokenStore,
        prompt: &'a P,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            oauth,
            store,
            prompt,
            timeout,
            transitions: Vec::new(),
        }
    }

    /// States visited so far, in order.
    pub fn transitions(&self) -> &[AuthState] {
        &self.transitions
    }

    pub fn state(&self) -> Option<AuthState> {
        self.transitions.last().copied()
    }

    fn enter(&mut self, state: AuthState) {
        self.transitions.push(state);
    }

    pub async fn authenticate(&mut self) -> Result<TokenManager> {
        self.enter(AuthState::CheckCache);
        match TokenManager::load(self.store.clone(), self.oauth.clone()).await {
            Ok(mgr) => {
                self.enter(AuthState::Authenticated);
                return Ok(mgr);
            }
            Err(e) => info!("{}", e),
        }

        match self.authorize_interactively().await {
            Ok(mgr) => {
                self.enter(AuthState::Authenticated);
                success!("Authentication successful!");
                Ok(mgr)
            }
            Err(e) => {
                self.enter(AuthState::Failed);
                Err(e)
            }
        }
    }

    async fn authorize_interactively(&mut self) -> Result<TokenManager> {
        self.enter(AuthState::AwaitingUserConsent);
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        let csrf_state = utils::generate_state();
        let auth_url = self.oauth.authorize_url(&csrf_state, &code_challenge);

        self.enter(AuthState::ListeningForCallback);
        let (server, code_rx) = CallbackServer::start(self.oauth.redirect_uri(), csrf_state).await?;
        self.prompt.present(&auth_url);

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, code_rx)
                .await
                .map_err(|_| Error::AuthTimeout(limit)),
            None => Ok(code_rx.await),
        };
        server.shutdown().await;

        let code = match outcome? {
            Ok(CallbackOutcome::Code(code)) => code,
            Ok(CallbackOutcome::Denied(reason)) => return Err(Error::AuthDenied(reason)),
            Err(_) => {
                return Err(Error::CallbackListener(
                    "listener closed before a callback arrived".to_string(),
                ));
            }
        };

        self.enter(AuthState::ExchangingCode);
        let token = self.oauth.exchange_code(&code, &code_verifier).await?;
        self.store.save(&token).await?;

        Ok(TokenManager::new(token, self.store.clone(), self.oauth.clone()))
    }
}
