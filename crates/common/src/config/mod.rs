//! Sectioned TOML configuration files
//!
//! Both config scopes are stored the same way: a TOML document whose
//! top-level tables are independent sections. A section type implements
//! [`ConfigSection`] and is read or replaced as a whole; sections nobody asked
//! for are carried through a load/persist cycle untouched.
//!
//! ```toml
//! [token]
//! publisher_endpoint = "https://localhost:9443/api/am/publisher/v0.12"
//! client_id = ""
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use toml::{Table, Value};

use mgw_runtime::ConfigError;

mod global;
mod label;

pub use global::{GlobalConfig, TokenConfig};
pub use label::{ContainerConfig, GatewayConfig, LabelConfig};

/// Trait that all configuration sections must implement
pub trait ConfigSection: Serialize + DeserializeOwned + Clone + Default {
    /// Key of this section in the top-level TOML table
    fn section_name() -> &'static str;
}

/// A config file held in memory as raw TOML sections
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    data: Table,
}

impl ConfigFile {
    /// An empty config that will be written to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: Table::new(),
        }
    }

    /// Load the file at `path`; a missing or malformed file is an error
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let parse_error = |source: anyhow::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let contents = fs::read_to_string(path)
            .context("Failed to read config file")
            .map_err(parse_error)?;

        let data = if contents.trim().is_empty() {
            Table::new()
        } else {
            toml::from_str(&contents)
                .context("Failed to parse config file")
                .map_err(parse_error)?
        };

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Get a section, if present
    pub fn get_section<T: ConfigSection>(&self) -> Result<Option<T>, ConfigError> {
        let section_name = T::section_name();

        self.data
            .get(section_name)
            .map(|value| {
                value
                    .clone()
                    .try_into()
                    .with_context(|| format!("Failed to deserialize {section_name} section"))
                    .map_err(|source| ConfigError::Parse {
                        path: self.path.clone(),
                        source,
                    })
            })
            .transpose()
    }

    /// Get a section, falling back to its default when absent
    pub fn section_or_default<T: ConfigSection>(&self) -> Result<T, ConfigError> {
        Ok(self.get_section()?.unwrap_or_default())
    }

    /// Replace a section
    pub fn set_section<T: ConfigSection>(&mut self, section: &T) -> Result<(), ConfigError> {
        let section_name = T::section_name();
        let value = Value::try_from(section)
            .with_context(|| format!("Failed to serialize {section_name} section"))
            .map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;

        self.data.insert(section_name.to_string(), value);
        Ok(())
    }

    /// Serialize and atomically replace the file on disk
    pub fn persist(&self) -> Result<(), ConfigError> {
        self.write_atomically().map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "Persisted config");
        Ok(())
    }

    fn write_atomically(&self) -> anyhow::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory at {}", parent.display())
        })?;

        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize config")?;

        let mut file = NamedTempFile::new_in(parent).context("Failed to create temporary file")?;
        file.write_all(contents.as_bytes())
            .context("Failed to write temporary file")?;
        file.persist(&self.path)
            .map_err(|e| e.error)
            .context("Failed to replace config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct TestSection {
        value: String,
        count: u32,
    }

    impl ConfigSection for TestSection {
        fn section_name() -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_section_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf/config.toml");

        let mut config = ConfigFile::new(&path);
        assert!(config.get_section::<TestSection>().unwrap().is_none());

        let section = TestSection {
            value: "hello".to_string(),
            count: 3,
        };
        config.set_section(&section).unwrap();
        config.persist().unwrap();

        let reloaded = ConfigFile::load(&path).unwrap();
        assert_eq!(reloaded.get_section::<TestSection>().unwrap(), Some(section));
    }

    #[test]
    fn test_unknown_sections_survive_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[custom]\nkey = \"kept\"\n").unwrap();

        let mut config = ConfigFile::load(&path).unwrap();
        config.set_section(&TestSection::default()).unwrap();
        config.persist().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[custom]"));
        assert!(contents.contains("kept"));
        let reloaded = ConfigFile::load(&path).unwrap();
        assert_eq!(
            reloaded.get_section::<TestSection>().unwrap(),
            Some(TestSection::default())
        );
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[invalid toml").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_file_has_no_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert!(config.get_section::<TestSection>().unwrap().is_none());
        assert_eq!(
            config.section_or_default::<TestSection>().unwrap(),
            TestSection::default()
        );
    }

    #[test]
    fn test_wrongly_typed_section_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[test]\nvalue = \"x\"\ncount = \"many\"\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();
        let err = config.get_section::<TestSection>().unwrap_err();
        assert!(err.to_string().contains("test section"));
    }

    #[test]
    fn test_persist_into_unwritable_location_is_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let config = ConfigFile::new(blocker.join("config.toml"));
        let err = config.persist().unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
    }
}
