//! HTTP client construction
//!
//! Trust material is explicit state: the global config yields a
//! [`TrustSettings`] value that is handed to [`build_http_client`] before any
//! remote call is made.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Certificate;

use crate::config::{DEFAULT_API_TIMEOUT_SECS, PROGRAM_NAME};

/// Encoding of the trust store file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustStoreType {
    /// One or more PEM certificates
    #[default]
    Pem,
    /// A single DER certificate
    Der,
}

impl FromStr for TrustStoreType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pem" => Ok(Self::Pem),
            "der" => Ok(Self::Der),
            other => bail!("unsupported trust store type '{other}' (expected 'pem' or 'der')"),
        }
    }
}

impl fmt::Display for TrustStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pem => "pem",
            Self::Der => "der",
        })
    }
}

/// Trust material used for every HTTPS call of a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustSettings {
    /// Encoding of the store
    pub store_type: TrustStoreType,
    /// Absolute path of the store; `None` uses the platform roots only
    pub location: Option<PathBuf>,
}

/// Endpoints of the credential issuer and management API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Dynamic client registration endpoint
    pub registration: String,
    /// OAuth2 token endpoint
    pub token: String,
    /// Publisher REST API base
    pub publisher: String,
    /// Admin REST API base
    pub admin: String,
}

/// Build a reqwest client trusting the configured store in addition to the
/// platform roots
pub fn build_http_client(trust: &TrustSettings) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_API_TIMEOUT_SECS))
        .user_agent(format!("{PROGRAM_NAME}/{}", env!("CARGO_PKG_VERSION")));

    if let Some(location) = &trust.location {
        let bytes = std::fs::read(location)
            .with_context(|| format!("Failed to read trust store {}", location.display()))?;

        let certificates = match trust.store_type {
            TrustStoreType::Pem => Certificate::from_pem_bundle(&bytes)
                .with_context(|| format!("Invalid PEM trust store {}", location.display()))?,
            TrustStoreType::Der => vec![
                Certificate::from_der(&bytes)
                    .with_context(|| format!("Invalid DER trust store {}", location.display()))?,
            ],
        };

        tracing::debug!(
            count = certificates.len(),
            store = %location.display(),
            "Adding trusted certificates"
        );
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }
    }

    builder.build().context("Failed to build HTTP client")
}
