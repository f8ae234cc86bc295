//! Core functionality for the micro gateway CLI
//!
//! This crate contains the foundational types used across the CLI: the error
//! taxonomy, the domain model, configuration constants, the management API
//! and OAuth clients, and the dependency injection interfaces.

/// Management API client
pub mod api_client;
/// Configuration constants
pub mod config;
/// Dependency injection traits and implementations
pub mod deps;
/// Error taxonomy
pub mod error;
/// HTTP client construction and trust settings
pub mod http;
/// Domain types
pub mod model;
/// OAuth client registration and token issuance
pub mod oauth;

// Re-export commonly used types at the crate root
pub use config::{
    DEFAULT_API_TIMEOUT_SECS, HOME_ENV_VAR, LOG_ENV_VAR, PROGRAM_NAME, TOKEN_SCOPES,
};
pub use deps::{
    CredentialIssuer, DistributionPackager, ManagementApi, MessageStyle, PolicyGenerator,
    ProgressIndicator, ProjectInitializer, RealRemoteServicesFactory, RemoteServices,
    RemoteServicesFactory, SourceGenerator, UserInterface,
};
pub use error::{
    CliError, ConfigError, CredentialError, ErrorKind, PipelineStage, RemoteResource, Result,
    UsageError, WorkspaceError,
};
pub use http::{ServiceEndpoints, TrustSettings, TrustStoreType};
pub use model::{
    AccessToken, ApiDefinition, ClientCredentials, Credentials, Password, RemoteDefinitions,
    ThrottlePolicy,
};
