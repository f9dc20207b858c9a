use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Token endpoint response, passed through to the client unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_expires_in: Option<i64>,
    pub token_type: String,
}

/// HTTP client for the identity provider's realm endpoints.
pub struct IdentityProviderClient {
    http: reqwest::Client,
    jwks_url: String,
    token_url: String,
    client_id: String,
    client_secret: Option<SecretString>,
}

impl IdentityProviderClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            jwks_url: config.jwks_url(),
            token_url: config.token_url(),
            client_id: config.oidc_client_id.clone(),
            client_secret: config.oidc_client_secret.clone(),
        })
    }

    pub async fn fetch_jwks(&self) -> AppResult<JwkSet> {
        let response = self.http.get(&self.jwks_url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::IdentityProvider(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let jwks = response.json::<JwkSet>().await?;
        log::info!("Fetched {} signing keys from {}", jwks.keys.len(), self.jwks_url);
        Ok(jwks)
    }

    pub async fn password_grant(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        self.token_request(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ])
        .await
    }

    pub async fn refresh_grant(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, grant: &[(&str, &str)]) -> AppResult<TokenResponse> {
        let mut form: Vec<(&str, &str)> = vec![("client_id", self.client_id.as_str())];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.expose_secret()));
        }
        form.extend_from_slice(grant);

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Token endpoint returned {}: {}", status, body);
            return Err(token_error(status));
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}

/// Rejected grants are the caller's fault; anything else is the provider's.
fn token_error(status: StatusCode) -> AppError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            AppError::Unauthorized("Invalid credentials".to_string())
        }
        other => AppError::IdentityProvider(format!("Token endpoint returned {}", other)),
    }
}
