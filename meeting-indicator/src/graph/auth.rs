use async_trait::async_trait;
use reqwest::Client;
use shared::{GraphErrorResponse, TokenResponse};

use crate::config::GraphCredentials;
use crate::error::{IndicatorError, IndicatorResult};
use crate::traits::AuthProvider;

const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Application (daemon) token flow against the Microsoft identity platform.
///
/// A fresh token is requested on every call; nothing is cached between cycles.
pub struct ClientCredentialsAuth {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsAuth {
    pub fn new(http: Client, credentials: &GraphCredentials) -> Self {
        Self {
            http,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                credentials.authority_host.trim_end_matches('/'),
                urlencoding::encode(&credentials.tenant_id)
            ),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl AuthProvider for ClientCredentialsAuth {
    async fn token(&self) -> IndicatorResult<String> {
        tracing::debug!("Requesting Graph access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", GRAPH_DEFAULT_SCOPE),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IndicatorError::network(format!("Token request timed out: {}", e))
                } else {
                    IndicatorError::auth(format!("Token request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IndicatorError::auth(format!(
                "Token endpoint returned {}: {}",
                status,
                GraphErrorResponse::summarize(&error_text)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IndicatorError::auth(format!("Failed to parse token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(IndicatorError::auth("Token endpoint returned an empty token"));
        }

        Ok(token.access_token)
    }
}
