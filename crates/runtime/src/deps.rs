//! Dependency injection traits for testability
//!
//! Every collaborator the setup pipeline talks to (console, credential issuer,
//! management API, generators, packager) sits behind a trait here so commands
//! can be exercised with fakes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::http::{ServiceEndpoints, TrustSettings};
use crate::model::{
    AccessToken, ApiDefinition, ClientCredentials, Credentials, ThrottlePolicy,
};

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);

    /// Prompt for text input; an empty answer is returned as-is
    fn prompt_input(&self, prompt: &str) -> Result<String>;

    /// Prompt for input without echoing it; an empty answer is returned as-is
    fn prompt_password(&self, prompt: &str) -> Result<String>;
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    /// Set the message
    fn set_message(&self, message: &str);

    /// Finish and clear the progress
    fn finish_and_clear(&self);

    /// Enable steady tick
    fn enable_steady_tick(&self, duration: Duration);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Cyan colored text
    Cyan,
    /// Warning style (typically yellow)
    Warning,
    /// Error style (typically red)
    Error,
    /// Success style (typically green)
    Success,
}

/// OAuth client registration and token issuance
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Register a client for the operator and return its id/secret
    async fn issue_client_credentials(&self, credentials: &Credentials)
    -> Result<ClientCredentials>;

    /// Exchange operator credentials for an access token
    async fn issue_access_token(
        &self,
        client: &ClientCredentials,
        credentials: &Credentials,
    ) -> Result<AccessToken>;
}

/// Management API operations used by the fetch stage
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// List the APIs deployed to a label
    async fn list_apis(&self, label: &str, token: &AccessToken) -> Result<Vec<ApiDefinition>>;

    /// List application-scoped throttle policies
    async fn list_application_policies(&self, token: &AccessToken) -> Result<Vec<ThrottlePolicy>>;

    /// List subscription-scoped throttle policies
    async fn list_subscription_policies(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ThrottlePolicy>>;
}

/// Remote collaborators bound to one set of endpoints and trust settings
pub struct RemoteServices {
    /// Credential issuer
    pub issuer: Box<dyn CredentialIssuer>,
    /// Management API client
    pub management_api: Box<dyn ManagementApi>,
}

/// Builds the remote collaborators once trust settings are known
pub trait RemoteServicesFactory: Send + Sync {
    /// Connect to the configured endpoints
    fn connect(&self, endpoints: &ServiceEndpoints, trust: &TrustSettings)
    -> Result<RemoteServices>;
}

/// Renders throttle policies
pub trait PolicyGenerator: Send + Sync {
    /// Write one artifact per policy into `output_dir`
    fn generate(
        &self,
        output_dir: &Path,
        application_policies: &[ThrottlePolicy],
        subscription_policies: &[ThrottlePolicy],
    ) -> Result<()>;
}

/// Renders API sources for a label
pub trait SourceGenerator: Send + Sync {
    /// Write one source artifact per API under the label's project
    fn generate(
        &self,
        project_root: &Path,
        label: &str,
        apis: &[ApiDefinition],
        overwrite: bool,
    ) -> Result<()>;
}

/// Prepares a label directory as a target-runtime project
pub trait ProjectInitializer: Send + Sync {
    /// Initialize the project rooted at `label_dir`
    fn initialize(&self, label_dir: &Path) -> Result<()>;
}

/// Packages a label project into a distribution
pub trait DistributionPackager: Send + Sync {
    /// Create the distribution and return its path
    fn package(&self, project_root: &Path, label: &str) -> Result<PathBuf>;
}

// Production implementations

/// Production factory talking HTTPS with reqwest
pub struct RealRemoteServicesFactory;

impl RemoteServicesFactory for RealRemoteServicesFactory {
    fn connect(
        &self,
        endpoints: &ServiceEndpoints,
        trust: &TrustSettings,
    ) -> Result<RemoteServices> {
        let client = crate::http::build_http_client(trust)?;

        Ok(RemoteServices {
            issuer: Box::new(crate::oauth::RealCredentialIssuer::new(
                client.clone(),
                endpoints,
            )),
            management_api: Box::new(crate::api_client::RealManagementApi::new(
                client, endpoints,
            )),
        })
    }
}
