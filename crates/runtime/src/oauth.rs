//! OAuth client registration and password-grant token issuance

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{PROGRAM_NAME, TOKEN_SCOPES};
use crate::deps::CredentialIssuer;
use crate::http::ServiceEndpoints;
use crate::model::{AccessToken, ClientCredentials, Credentials};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationRequest<'a> {
    callback_url: &'a str,
    client_name: &'a str,
    owner: &'a str,
    grant_type: &'a str,
    saas_app: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationResponse {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    error_description: Option<String>,
}

/// Production credential issuer
pub struct RealCredentialIssuer {
    client: reqwest::Client,
    registration_endpoint: String,
    token_endpoint: String,
}

impl RealCredentialIssuer {
    /// Create an issuer for the given endpoints
    pub fn new(client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            client,
            registration_endpoint: endpoints.registration.clone(),
            token_endpoint: endpoints.token.clone(),
        }
    }
}

#[async_trait]
impl CredentialIssuer for RealCredentialIssuer {
    async fn issue_client_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<ClientCredentials> {
        tracing::debug!(endpoint = %self.registration_endpoint, "Registering OAuth client");

        let request = RegistrationRequest {
            callback_url: "www.google.lk",
            client_name: PROGRAM_NAME,
            owner: &credentials.username,
            grant_type: "password refresh_token",
            saas_app: true,
        };

        let response = self
            .client
            .post(&self.registration_endpoint)
            .basic_auth(&credentials.username, Some(credentials.password.expose()))
            .json(&request)
            .send()
            .await
            .context("Failed to send client registration request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Client registration failed: {} - {}", status, body));
        }

        let registration = response
            .json::<RegistrationResponse>()
            .await
            .context("Failed to parse client registration response")?;

        Ok(ClientCredentials {
            client_id: registration.client_id,
            client_secret: registration.client_secret,
        })
    }

    async fn issue_access_token(
        &self,
        client: &ClientCredentials,
        credentials: &Credentials,
    ) -> Result<AccessToken> {
        tracing::debug!(endpoint = %self.token_endpoint, "Requesting access token");

        let response = self
            .client
            .post(&self.token_endpoint)
            .basic_auth(&client.client_id, Some(&client.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.expose()),
                ("scope", TOKEN_SCOPES),
            ])
            .send()
            .await
            .context("Failed to send token request")?;

        if response.status().is_success() {
            let token = response
                .json::<TokenResponse>()
                .await
                .context("Failed to parse token response")?;
            return Ok(AccessToken::new(token.access_token));
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<TokenError>(&body) {
            Ok(error) => Err(anyhow!(
                "Token error: {} - {}",
                error.error,
                error.error_description.unwrap_or_default()
            )),
            Err(_) => Err(anyhow!("Token request failed: {} - {}", status, body)),
        }
    }
}
