//! Per-label deployment settings

use std::path::{Path, PathBuf};

use garde::Validate;
use serde::{Deserialize, Serialize};

use mgw_runtime::ConfigError;

use super::{ConfigFile, ConfigSection};

/// `[gateway]` section: listener ports of the generated gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// Plain HTTP listener port
    #[garde(range(min = 1))]
    pub http_port: u16,

    /// HTTPS listener port
    #[garde(range(min = 1))]
    pub https_port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http_port: 9090,
            https_port: 9095,
        }
    }
}

impl ConfigSection for GatewayConfig {
    fn section_name() -> &'static str {
        "gateway"
    }
}

/// `[container]` section: image settings for containerized deployments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContainerConfig {
    /// Image name; the label is used when empty
    #[garde(skip)]
    pub image: String,

    /// Image tag
    #[garde(skip)]
    pub tag: String,
}

impl ConfigSection for ContainerConfig {
    fn section_name() -> &'static str {
        "container"
    }
}

/// Config file scoped to one label
#[derive(Debug, Clone)]
pub struct LabelConfig {
    file: ConfigFile,
    /// Gateway listener settings
    pub gateway: GatewayConfig,
    /// Container settings
    pub container: ContainerConfig,
}

impl LabelConfig {
    /// A default config that will be written to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: ConfigFile::new(path),
            gateway: GatewayConfig::default(),
            container: ContainerConfig::default(),
        }
    }

    /// Load and validate the config at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = ConfigFile::load(path)?;
        let gateway: GatewayConfig = file.section_or_default()?;
        let container: ContainerConfig = file.section_or_default()?;

        gateway.validate().map_err(|report| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: report.to_string(),
        })?;

        Ok(Self {
            file,
            gateway,
            container,
        })
    }

    /// Write the config back
    pub fn persist(&mut self) -> Result<(), ConfigError> {
        self.file.set_section(&self.gateway)?;
        self.file.set_section(&self.container)?;
        self.file.persist()
    }
}
