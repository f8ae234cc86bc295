//! Domain types exchanged between the credential flow, the management API
//! and the generators

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator password, held in memory only for one `setup` run
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap a password
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the password to the credential issuer
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Username/password pair for one `setup` run; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Operator username
    pub username: String,
    /// Operator password
    pub password: Password,
}

/// OAuth client registered for the CLI
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCredentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Bearer token authorizing the fetch stage of a single run
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a bearer token
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Raw token value for the `Authorization` header
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// An API deployed to a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    /// Management API identifier
    #[serde(default)]
    pub id: String,
    /// API name
    pub name: String,
    /// Base path the API is exposed under
    pub context: String,
    /// API version
    pub version: String,
    /// Publisher of the API
    #[serde(default)]
    pub provider: String,
    /// Lifecycle state, e.g. `PUBLISHED`
    #[serde(default)]
    pub lifecycle_status: String,
    /// Backend endpoint configuration as published (JSON text)
    #[serde(default)]
    pub endpoint_config: Option<String>,
    /// Subscription tiers the API accepts
    #[serde(default)]
    pub tiers: Vec<String>,
}

/// A throttling policy, application- or subscription-scoped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottlePolicy {
    /// Management API identifier
    #[serde(default)]
    pub policy_id: String,
    /// Unique policy name
    pub policy_name: String,
    /// Human readable name
    #[serde(default)]
    pub display_name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Quota applied by the policy
    #[serde(default)]
    pub default_limit: Option<ThrottleLimit>,
    /// Whether requests are rejected once the quota is spent
    #[serde(default)]
    pub stop_on_quota_reach: Option<bool>,
}

/// Quota definition of a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleLimit {
    /// `RequestCountLimit` or `BandwidthLimit`
    #[serde(rename = "type")]
    pub limit_type: String,
    /// Request count quota, when `limit_type` is `RequestCountLimit`
    #[serde(default)]
    pub request_count_limit: Option<RequestCountLimit>,
}

/// Request count quota
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCountLimit {
    /// `min`, `hour`, `day` ...
    pub time_unit: String,
    /// Number of time units in the window
    pub unit_time: u64,
    /// Requests allowed in the window
    pub request_count: u64,
}

/// Everything fetched for a label, consumed once by the generation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteDefinitions {
    /// APIs deployed to the label
    pub apis: Vec<ApiDefinition>,
    /// Application-scoped policies
    pub application_policies: Vec<ThrottlePolicy>,
    /// Subscription-scoped policies
    pub subscription_policies: Vec<ThrottlePolicy>,
}
