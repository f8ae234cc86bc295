//! Test helper utilities and mock implementations for mgw-commands
//!
//! Synchronous collaborators are mocked with mockall. The async remote
//! collaborators use hand-written fakes that record their calls, since they
//! have to be handed out as boxed trait objects by a factory and still be
//! inspected after the command finished.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use mockall::mock;

use mgw_runtime::deps::*;
use mgw_runtime::http::{ServiceEndpoints, TrustSettings};
use mgw_runtime::model::{
    AccessToken, ApiDefinition, ClientCredentials, Credentials, ThrottlePolicy,
};
use mgw_runtime::RemoteResource;

pub use mgw_common::ui::TestUserInterface;

// Mock implementation of the PolicyGenerator trait.
//
// ```rust
// let mut policy_generator = MockPolicyGeneratorMock::new();
// policy_generator.expect_generate().times(1).returning(|_, _, _| Ok(()));
// ```
mock! {
    pub PolicyGeneratorMock {}

    impl PolicyGenerator for PolicyGeneratorMock {
        fn generate(
            &self,
            output_dir: &Path,
            application_policies: &[ThrottlePolicy],
            subscription_policies: &[ThrottlePolicy],
        ) -> Result<()>;
    }
}

// Mock implementation of the SourceGenerator trait.
mock! {
    pub SourceGeneratorMock {}

    impl SourceGenerator for SourceGeneratorMock {
        fn generate(
            &self,
            project_root: &Path,
            label: &str,
            apis: &[ApiDefinition],
            overwrite: bool,
        ) -> Result<()>;
    }
}

// Mock implementation of the ProjectInitializer trait.
mock! {
    pub ProjectInitializerMock {}

    impl ProjectInitializer for ProjectInitializerMock {
        fn initialize(&self, label_dir: &Path) -> Result<()>;
    }
}

// Mock implementation of the DistributionPackager trait.
mock! {
    pub DistributionPackagerMock {}

    impl DistributionPackager for DistributionPackagerMock {
        fn package(&self, project_root: &Path, label: &str) -> Result<PathBuf>;
    }
}

/// Client credentials handed out by [`FakeCredentialIssuer`]
pub fn issued_client() -> ClientCredentials {
    ClientCredentials {
        client_id: "issued-id".to_string(),
        client_secret: "issued-secret".to_string(),
    }
}

/// Recording credential issuer
#[derive(Clone, Default)]
pub struct FakeCredentialIssuer {
    /// `issue_client_credentials:<user>` and `issue_access_token:<client>:<user>`
    pub calls: Arc<Mutex<Vec<String>>>,
    fail_issuance: bool,
    fail_token: bool,
}

impl FakeCredentialIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuance_failure(mut self) -> Self {
        self.fail_issuance = true;
        self
    }

    pub fn with_token_failure(mut self) -> Self {
        self.fail_token = true;
        self
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn issuance_count(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| c.starts_with("issue_client_credentials"))
            .count()
    }
}

#[async_trait]
impl CredentialIssuer for FakeCredentialIssuer {
    async fn issue_client_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<ClientCredentials> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("issue_client_credentials:{}", credentials.username));
        if self.fail_issuance {
            return Err(anyhow!("Client registration failed: 401 Unauthorized"));
        }
        Ok(issued_client())
    }

    async fn issue_access_token(
        &self,
        client: &ClientCredentials,
        credentials: &Credentials,
    ) -> Result<AccessToken> {
        self.calls.lock().unwrap().push(format!(
            "issue_access_token:{}:{}",
            client.client_id, credentials.username
        ));
        if self.fail_token {
            return Err(anyhow!("Token error: invalid_grant"));
        }
        Ok(AccessToken::new("test-token".to_string()))
    }
}

/// Recording management API with canned responses
#[derive(Clone, Default)]
pub struct FakeManagementApi {
    /// Resources requested, in order
    pub calls: Arc<Mutex<Vec<RemoteResource>>>,
    apis: Vec<ApiDefinition>,
    application_policies: Vec<ThrottlePolicy>,
    subscription_policies: Vec<ThrottlePolicy>,
    failing: Option<RemoteResource>,
}

impl FakeManagementApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apis(mut self, apis: Vec<ApiDefinition>) -> Self {
        self.apis = apis;
        self
    }

    pub fn with_policies(
        mut self,
        application: Vec<ThrottlePolicy>,
        subscription: Vec<ThrottlePolicy>,
    ) -> Self {
        self.application_policies = application;
        self.subscription_policies = subscription;
        self
    }

    pub fn failing_on(mut self, resource: RemoteResource) -> Self {
        self.failing = Some(resource);
        self
    }

    pub fn get_calls(&self) -> Vec<RemoteResource> {
        self.calls.lock().unwrap().clone()
    }

    fn respond<T: Clone>(&self, resource: RemoteResource, items: &[T]) -> Result<Vec<T>> {
        self.calls.lock().unwrap().push(resource);
        if self.failing == Some(resource) {
            return Err(anyhow!("HTTP 500 Internal Server Error"));
        }
        Ok(items.to_vec())
    }
}

#[async_trait]
impl ManagementApi for FakeManagementApi {
    async fn list_apis(&self, _label: &str, _token: &AccessToken) -> Result<Vec<ApiDefinition>> {
        self.respond(RemoteResource::Apis, &self.apis)
    }

    async fn list_application_policies(&self, _token: &AccessToken) -> Result<Vec<ThrottlePolicy>> {
        self.respond(
            RemoteResource::ApplicationPolicies,
            &self.application_policies,
        )
    }

    async fn list_subscription_policies(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<ThrottlePolicy>> {
        self.respond(
            RemoteResource::SubscriptionPolicies,
            &self.subscription_policies,
        )
    }
}

/// Factory handing out clones of the fakes
#[derive(Clone, Default)]
pub struct FakeServicesFactory {
    pub issuer: FakeCredentialIssuer,
    pub management_api: FakeManagementApi,
    /// Trust settings of every `connect` call
    pub connections: Arc<Mutex<Vec<TrustSettings>>>,
}

impl FakeServicesFactory {
    pub fn new(issuer: FakeCredentialIssuer, management_api: FakeManagementApi) -> Self {
        Self {
            issuer,
            management_api,
            connections: Arc::default(),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}

impl RemoteServicesFactory for FakeServicesFactory {
    fn connect(
        &self,
        _endpoints: &ServiceEndpoints,
        trust: &TrustSettings,
    ) -> Result<RemoteServices> {
        self.connections.lock().unwrap().push(trust.clone());
        Ok(RemoteServices {
            issuer: Box::new(self.issuer.clone()),
            management_api: Box::new(self.management_api.clone()),
        })
    }
}

/// An API as the management API lists it
pub fn sample_api(name: &str) -> ApiDefinition {
    ApiDefinition {
        id: format!("{}-id", name.to_lowercase()),
        name: name.to_string(),
        context: format!("/{}", name.to_lowercase()),
        version: "1.0.0".to_string(),
        provider: "admin".to_string(),
        lifecycle_status: "PUBLISHED".to_string(),
        endpoint_config: None,
        tiers: vec!["Unlimited".to_string()],
    }
}

/// A policy without a quota
pub fn sample_policy(name: &str) -> ThrottlePolicy {
    ThrottlePolicy {
        policy_id: format!("{}-id", name.to_lowercase()),
        policy_name: name.to_string(),
        display_name: name.to_string(),
        description: String::new(),
        default_limit: None,
        stop_on_quota_reach: None,
    }
}
