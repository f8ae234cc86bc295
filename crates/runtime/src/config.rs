//! Centralized configuration constants for the micro gateway CLI
//!
//! This module provides a single source of truth for the names, defaults and
//! file locations used throughout the application.
//!
//! # Environment Variables
//!
//! - `MICRO_GW_HOME`: Override the CLI home directory (default `~/.micro-gw`)
//! - `MICRO_GW_LOG`: Log filter directives for the CLI (falls back to `RUST_LOG`)

/// Program name used in usage output and as the registered OAuth client name
pub const PROGRAM_NAME: &str = "micro-gw";

/// Environment variable name for overriding the CLI home directory
pub const HOME_ENV_VAR: &str = "MICRO_GW_HOME";

/// Environment variable name for log filter directives
pub const LOG_ENV_VAR: &str = "MICRO_GW_LOG";

/// Directory under the user's home holding CLI state
pub const CLI_HOME_DIR: &str = ".micro-gw";

/// Default publisher REST API endpoint
pub const DEFAULT_PUBLISHER_ENDPOINT: &str = "https://localhost:9443/api/am/publisher/v0.12";

/// Default admin REST API endpoint
pub const DEFAULT_ADMIN_ENDPOINT: &str = "https://localhost:9443/api/am/admin/v0.12";

/// Default dynamic client registration endpoint
pub const DEFAULT_REGISTRATION_ENDPOINT: &str =
    "https://localhost:9443/client-registration/v0.12/register";

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://localhost:8243/token";

/// Scopes requested for the access token used by the fetch stage
pub const TOKEN_SCOPES: &str = "apim:api_view apim:tier_view";

/// Default HTTP timeout in seconds for management API calls
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
