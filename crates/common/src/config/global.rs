//! Global config: endpoints, trust material and the cached OAuth client

use std::path::{Path, PathBuf};

use garde::Validate;
use serde::{Deserialize, Serialize};

use mgw_runtime::config::{
    DEFAULT_ADMIN_ENDPOINT, DEFAULT_PUBLISHER_ENDPOINT, DEFAULT_REGISTRATION_ENDPOINT,
    DEFAULT_TOKEN_ENDPOINT,
};
use mgw_runtime::{ClientCredentials, ConfigError, ServiceEndpoints, TrustSettings};

use super::{ConfigFile, ConfigSection};

/// `[token]` section of the global config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TokenConfig {
    /// Publisher REST API base
    #[garde(pattern(r"^https?://"))]
    pub publisher_endpoint: String,

    /// Admin REST API base
    #[garde(pattern(r"^https?://"))]
    pub admin_endpoint: String,

    /// Dynamic client registration endpoint
    #[garde(pattern(r"^https?://"))]
    pub registration_endpoint: String,

    /// OAuth2 token endpoint
    #[garde(pattern(r"^https?://"))]
    pub token_endpoint: String,

    /// Cached operator username
    #[garde(skip)]
    pub username: String,

    /// Cached OAuth client id
    #[garde(skip)]
    pub client_id: String,

    /// Cached OAuth client secret
    #[garde(skip)]
    pub client_secret: String,

    /// Trust store file; relative paths resolve against the workspace root
    #[garde(skip)]
    pub trust_store_location: String,

    /// Trust store password, kept for stores that need one
    #[garde(skip)]
    pub trust_store_password: String,

    /// `pem` or `der`
    #[garde(custom(validate_trust_store_type))]
    pub trust_store_type: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            publisher_endpoint: DEFAULT_PUBLISHER_ENDPOINT.to_string(),
            admin_endpoint: DEFAULT_ADMIN_ENDPOINT.to_string(),
            registration_endpoint: DEFAULT_REGISTRATION_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            username: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            trust_store_location: String::new(),
            trust_store_password: String::new(),
            trust_store_type: "pem".to_string(),
        }
    }
}

impl ConfigSection for TokenConfig {
    fn section_name() -> &'static str {
        "token"
    }
}

fn validate_trust_store_type(value: &str, _: &()) -> garde::Result {
    value
        .parse::<mgw_runtime::TrustStoreType>()
        .map(|_| ())
        .map_err(|e| garde::Error::new(e.to_string()))
}

impl TokenConfig {
    /// Cached client credentials; a half-populated pair counts as absent
    pub fn cached_client(&self) -> Option<ClientCredentials> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return None;
        }
        Some(ClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        })
    }

    /// Cache a newly issued client
    pub fn cache_client(&mut self, client: &ClientCredentials) {
        self.client_id.clone_from(&client.client_id);
        self.client_secret.clone_from(&client.client_secret);
    }

    /// Forget the cached client and username together
    pub fn clear_client_credentials(&mut self) {
        self.username.clear();
        self.client_id.clear();
        self.client_secret.clear();
    }

    /// Cached username, if any
    pub fn cached_username(&self) -> Option<&str> {
        let username = self.username.trim();
        (!username.is_empty()).then_some(username)
    }

    /// Endpoints of the remote services
    pub fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            registration: self.registration_endpoint.clone(),
            token: self.token_endpoint.clone(),
            publisher: self.publisher_endpoint.clone(),
            admin: self.admin_endpoint.clone(),
        }
    }

    /// Trust settings with the store location resolved against `workspace_root`
    pub fn trust_settings(&self, workspace_root: &Path) -> TrustSettings {
        let location = self.trust_store_location.trim();
        let location = (!location.is_empty()).then(|| {
            let path = PathBuf::from(location);
            if path.is_absolute() {
                path
            } else {
                workspace_root.join(path)
            }
        });

        TrustSettings {
            // Validated on load
            store_type: self.trust_store_type.parse().unwrap_or_default(),
            location,
        }
    }
}

/// The workspace-wide config file
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    file: ConfigFile,
    /// Credential endpoints, trust material and cached client
    pub token: TokenConfig,
}

impl GlobalConfig {
    /// A default config that will be written to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: ConfigFile::new(path),
            token: TokenConfig::default(),
        }
    }

    /// Load and validate the config at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = ConfigFile::load(path)?;
        let token: TokenConfig = file.section_or_default()?;

        token.validate().map_err(|report| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: report.to_string(),
        })?;

        Ok(Self { file, token })
    }

    /// Write the config back, keeping sections this type does not own
    pub fn persist(&mut self) -> Result<(), ConfigError> {
        self.file.set_section(&self.token)?;
        self.file.persist()
    }
}
