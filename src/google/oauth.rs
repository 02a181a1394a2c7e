use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    Error, Result,
    types::{ClientDescriptor, Token, TokenResponse},
};

/// Talks to the OAuth endpoints of the registered client application.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    descriptor: Arc<ClientDescriptor>,
    scope: String,
}

/// Error body of a failed token request.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthClient {
    pub fn new(http: Client, descriptor: ClientDescriptor, scope: impl Into<String>) -> Self {
        Self {
            http,
            descriptor: Arc::new(descriptor),
            scope: scope.into(),
        }
    }

    pub fn descriptor(&self) -> &ClientDescriptor {
        &self.descriptor
    }

    pub fn redirect_uri(&self) -> &Url {
        &self.descriptor.redirect_uri
    }

    /// Consent URL asking for offline access, bound to `state` and the PKCE
    /// `code_challenge`.
    pub fn authorize_url(&self, state: &str, code_challenge: &str) -> Url {
        let mut url = self.descriptor.auth_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.descriptor.client_id)
            .append_pair("redirect_uri", self.descriptor.redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope)
            .append_pair("state", state)
            .append_pair("access_type", "offline")
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "S256");
        url
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token> {
        let d = &self.descriptor;
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", d.client_id.as_str()),
            ("client_secret", d.client_secret.as_str()),
            ("redirect_uri", d.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ])
        .await
        .map_err(Error::TokenExchange)
    }

    /// Uses a refresh token to obtain a new access token. Google usually omits
    /// the refresh token from the response, in which case the old one is kept.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        let d = &self.descriptor;
        let mut token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", d.client_id.as_str()),
                ("client_secret", d.client_secret.as_str()),
            ])
            .await
            .map_err(Error::TokenRefresh)?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> std::result::Result<Token, String> {
        let res = self
            .http
            .post(self.descriptor.token_endpoint.clone())
            .form(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {}", err.error, desc),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(format!("{status}: {detail}"));
        }

        let token: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
        Ok(token.into_token(Utc::now()))
    }
}
