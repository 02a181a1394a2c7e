mod common;

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use gphotos_manifest::{
    Error,
    api::{DENIED_BODY, SUCCESS_BODY},
    google::{AuthFlow, ConsentPrompt},
    management::TokenStore,
    types::AuthState,
};
use reqwest::Url;
use serde_json::json;
use tempfile::{TempDir, tempdir};
use tokio::task::JoinHandle;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_string_contains, method, path},
};

use common::{expired_token, free_port, fresh_token, oauth_client};

/// Fails the test if the consent step is ever reached.
#[derive(Default)]
struct NeverPrompt {
    calls: AtomicUsize,
}

impl ConsentPrompt for NeverPrompt {
    fn present(&self, _auth_url: &Url) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Plays the browser: follows the consent URL straight back to the redirect
/// URI with the given query, reusing the `state` unless told otherwise.
struct BrowserStub {
    params: Vec<(&'static str, &'static str)>,
    forge_state: bool,
    seen_url: Mutex<Option<Url>>,
    response: Mutex<Option<JoinHandle<(u16, String)>>>,
}

impl BrowserStub {
    fn new(params: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            params,
            forge_state: false,
            seen_url: Mutex::new(None),
            response: Mutex::new(None),
        }
    }

    fn forging_state(mut self) -> Self {
        self.forge_state = true;
        self
    }

    async fn response(&self) -> (u16, String) {
        let handle = self.response.lock().unwrap().take().expect("browser was not used");
        handle.await.unwrap()
    }

    fn seen_url(&self) -> Url {
        self.seen_url.lock().unwrap().clone().expect("no consent url presented")
    }
}

impl ConsentPrompt for BrowserStub {
    fn present(&self, auth_url: &Url) {
        *self.seen_url.lock().unwrap() = Some(auth_url.clone());

        let query = |key: &str| {
            auth_url
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .unwrap()
        };
        let mut target = Url::parse(&query("redirect_uri")).unwrap();
        {
            let mut pairs = target.query_pairs_mut();
            for (k, v) in &self.params {
                pairs.append_pair(k, v);
            }
            let state = if self.forge_state {
                "forged".to_string()
            } else {
                query("state")
            };
            pairs.append_pair("state", &state);
        }

        let handle = tokio::spawn(async move {
            let res = reqwest::get(target).await.unwrap();
            let status = res.status().as_u16();
            (status, res.text().await.unwrap())
        });
        *self.response.lock().unwrap() = Some(handle);
    }
}

fn redirect_uri() -> String {
    format!("http://127.0.0.1:{}/auth/google/callback", free_port())
}

fn token_store(dir: &TempDir) -> TokenStore {
    TokenStore::new(dir.path().join("token.json"))
}

async fn mount_code_exchange(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=test-code"))
        .and(body_string_contains("code_verifier="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": "https://www.googleapis.com/auth/photoslibrary.readonly"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fresh_cached_token_skips_consent() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = token_store(&dir);
    store.save(&fresh_token("cached-access")).await.unwrap();

    let prompt = NeverPrompt::default();
    let oauth = oauth_client(&server.uri(), &redirect_uri());
    let mut flow = AuthFlow::new(oauth, store, &prompt, Some(Duration::from_secs(5)));

    let mgr = flow.authenticate().await.unwrap();

    assert_eq!(mgr.current_token().access_token, "cached-access");
    assert_eq!(
        flow.transitions(),
        [AuthState::CheckCache, AuthState::Authenticated]
    );
    assert_eq!(prompt.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_cache_runs_interactive_flow_and_saves_token() {
    let server = MockServer::start().await;
    mount_code_exchange(&server).await;

    let dir = tempdir().unwrap();
    let redirect = redirect_uri();
    let prompt = BrowserStub::new(vec![("code", "test-code")]);
    let oauth = oauth_client(&server.uri(), &redirect);
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_secs(10)));

    let mgr = flow.authenticate().await.unwrap();

    assert_eq!(
        flow.transitions(),
        [
            AuthState::CheckCache,
            AuthState::AwaitingUserConsent,
            AuthState::ListeningForCallback,
            AuthState::ExchangingCode,
            AuthState::Authenticated,
        ]
    );
    assert_eq!(mgr.current_token().access_token, "new-access");

    // the browser got the confirmation page
    assert_eq!(prompt.response().await, (200, SUCCESS_BODY.to_string()));

    // reloading the store yields the new token
    let reloaded = token_store(&dir).load().await.unwrap();
    assert_eq!(reloaded.access_token, "new-access");
    assert_eq!(reloaded.refresh_token.as_deref(), Some("new-refresh"));
    assert!(reloaded.is_fresh());
}

#[tokio::test]
async fn test_consent_url_carries_oauth_parameters() {
    let server = MockServer::start().await;
    mount_code_exchange(&server).await;

    let dir = tempdir().unwrap();
    let redirect = redirect_uri();
    let prompt = BrowserStub::new(vec![("code", "test-code")]);
    let oauth = oauth_client(&server.uri(), &redirect);
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_secs(10)));

    flow.authenticate().await.unwrap();

    let url = prompt.seen_url();
    let param = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };
    assert_eq!(url.host_str(), Some("accounts.example.com"));
    assert_eq!(param("client_id").as_deref(), Some("client-123.apps.googleusercontent.com"));
    assert_eq!(param("redirect_uri").as_deref(), Some(redirect.as_str()));
    assert_eq!(param("response_type").as_deref(), Some("code"));
    assert_eq!(param("access_type").as_deref(), Some("offline"));
    assert_eq!(param("code_challenge_method").as_deref(), Some("S256"));
    assert_eq!(param("state").map(|s| s.len()), Some(32));
    assert!(param("code_challenge").is_some());
}

#[tokio::test]
async fn test_expired_token_with_refresh_is_refreshed_without_consent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "refreshed-access",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = token_store(&dir);
    store
        .save(&expired_token("stale-access", Some("old-refresh")))
        .await
        .unwrap();

    let prompt = NeverPrompt::default();
    let oauth = oauth_client(&server.uri(), &redirect_uri());
    let mut flow = AuthFlow::new(oauth, store, &prompt, Some(Duration::from_secs(5)));

    let mgr = flow.authenticate().await.unwrap();

    assert_eq!(mgr.current_token().access_token, "refreshed-access");
    assert_eq!(prompt.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        flow.transitions(),
        [AuthState::CheckCache, AuthState::Authenticated]
    );

    // refreshed token was re-saved and kept the refresh token
    let reloaded = token_store(&dir).load().await.unwrap();
    assert_eq!(reloaded.access_token, "refreshed-access");
    assert_eq!(reloaded.refresh_token.as_deref(), Some("old-refresh"));
}

#[tokio::test]
async fn test_expired_token_without_refresh_falls_back_to_consent() {
    let server = MockServer::start().await;
    mount_code_exchange(&server).await;

    let dir = tempdir().unwrap();
    let store = token_store(&dir);
    store.save(&expired_token("stale", None)).await.unwrap();

    let prompt = BrowserStub::new(vec![("code", "test-code")]);
    let oauth = oauth_client(&server.uri(), &redirect_uri());
    let mut flow = AuthFlow::new(oauth, store, &prompt, Some(Duration::from_secs(10)));

    let mgr = flow.authenticate().await.unwrap();

    assert_eq!(mgr.current_token().access_token, "new-access");
    assert!(flow.transitions().contains(&AuthState::ExchangingCode));
}

#[tokio::test]
async fn test_denied_consent_fails() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let prompt = BrowserStub::new(vec![("error", "access_denied")]);
    let oauth = oauth_client(&server.uri(), &redirect_uri());
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_secs(10)));

    let result = flow.authenticate().await;

    match result {
        Err(Error::AuthDenied(reason)) => assert_eq!(reason, "access_denied"),
        other => panic!("expected AuthDenied, got {:?}", other.err()),
    }
    assert_eq!(flow.state(), Some(AuthState::Failed));
    assert_eq!(prompt.response().await, (200, DENIED_BODY.to_string()));
    assert!(token_store(&dir).load().await.is_err());
}

#[tokio::test]
async fn test_no_callback_times_out_and_releases_port() {
    let dir = tempdir().unwrap();
    let port = free_port();
    let redirect = format!("http://127.0.0.1:{port}/cb");
    let prompt = NeverPrompt::default();
    let oauth = oauth_client("http://127.0.0.1:9", &redirect);
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_millis(200)));

    let result = flow.authenticate().await;

    assert!(matches!(result, Err(Error::AuthTimeout(_))));
    assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        flow.transitions(),
        [
            AuthState::CheckCache,
            AuthState::AwaitingUserConsent,
            AuthState::ListeningForCallback,
            AuthState::Failed,
        ]
    );

    // the listener was shut down
    std::net::TcpListener::bind(("127.0.0.1", port)).expect("port released after timeout");
}

#[tokio::test]
async fn test_callback_with_forged_state_is_rejected() {
    let dir = tempdir().unwrap();
    let prompt = BrowserStub::new(vec![("code", "test-code")]).forging_state();
    let oauth = oauth_client("http://127.0.0.1:9", &redirect_uri());
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_millis(500)));

    let result = flow.authenticate().await;

    assert!(matches!(result, Err(Error::AuthTimeout(_))));
    assert_eq!(prompt.response().await.0, 400);
}

#[tokio::test]
async fn test_failed_exchange_is_token_exchange_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Bad Request"
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let prompt = BrowserStub::new(vec![("code", "test-code")]);
    let oauth = oauth_client(&server.uri(), &redirect_uri());
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_secs(10)));

    let result = flow.authenticate().await;

    match result {
        Err(Error::TokenExchange(reason)) => assert!(reason.contains("invalid_grant")),
        other => panic!("expected TokenExchange, got {:?}", other.err()),
    }
    assert_eq!(flow.state(), Some(AuthState::Failed));
    assert!(token_store(&dir).load().await.is_err());
}

#[tokio::test]
async fn test_occupied_callback_port_is_listener_error() {
    let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = blocker.local_addr().unwrap().port();

    let dir = tempdir().unwrap();
    let prompt = NeverPrompt::default();
    let oauth = oauth_client("http://127.0.0.1:9", &format!("http://127.0.0.1:{port}/cb"));
    let mut flow = AuthFlow::new(oauth, token_store(&dir), &prompt, Some(Duration::from_secs(1)));

    let result = flow.authenticate().await;

    assert!(matches!(result, Err(Error::CallbackListener(_))));
    assert_eq!(prompt.calls.load(Ordering::SeqCst), 0);
}
