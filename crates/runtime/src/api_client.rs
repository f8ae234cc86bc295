//! Management API client for the fetch stage

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::deps::ManagementApi;
use crate::http::ServiceEndpoints;
use crate::model::{AccessToken, ApiDefinition, ThrottlePolicy};

/// List envelope returned by the management REST APIs
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
}

/// Production management API client
pub struct RealManagementApi {
    client: reqwest::Client,
    publisher_endpoint: String,
    admin_endpoint: String,
}

impl RealManagementApi {
    /// Create a client for the given endpoints
    pub fn new(client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            client,
            publisher_endpoint: endpoints.publisher.trim_end_matches('/').to_string(),
            admin_endpoint: endpoints.admin.trim_end_matches('/').to_string(),
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &AccessToken,
    ) -> Result<Vec<T>> {
        tracing::debug!(%url, "Fetching list from management API");

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token.secret())
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} returned {} - {}", url, status, body));
        }

        let envelope = response
            .json::<ListResponse<T>>()
            .await
            .with_context(|| format!("Failed to parse response from {url}"))?;

        Ok(envelope.list)
    }
}

#[async_trait]
impl ManagementApi for RealManagementApi {
    async fn list_apis(&self, label: &str, token: &AccessToken) -> Result<Vec<ApiDefinition>> {
        let url = format!("{}/apis", self.publisher_endpoint);
        let query = format!("label:{label}");
        self.get_list(&url, &[("query", query.as_str()), ("expand", "true")], token)
            .await
    }

    async fn list_application_policies(&self, token: &AccessToken) -> Result<Vec<ThrottlePolicy>> {
        let url = format!("{}/throttling/policies/application", self.admin_endpoint);
        self.get_list(&url, &[], token).await
    }

    async fn list_subscription_policies(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ThrottlePolicy>> {
        let url = format!("{}/throttling/policies/subscription", self.admin_endpoint);
        self.get_list(&url, &[], token).await
    }
}
