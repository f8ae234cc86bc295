//! Target-runtime project initialization

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::json;

use mgw_runtime::deps::ProjectInitializer;

use crate::templates::{self, MANIFEST, Templates};

const MANIFEST_FILE: &str = "Ballerina.toml";
const PROJECT_MARKER_DIR: &str = ".ballerina";
const PROJECT_VERSION: &str = "0.0.1";

/// Turns a label directory into a Ballerina project
pub struct BallerinaProjectInitializer {
    templates: Templates,
}

impl BallerinaProjectInitializer {
    /// Create an initializer with the built-in templates
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: Templates::new()?,
        })
    }
}

impl ProjectInitializer for BallerinaProjectInitializer {
    fn initialize(&self, label_dir: &Path) -> Result<()> {
        if !label_dir.is_dir() {
            bail!("Label directory {} does not exist", label_dir.display());
        }

        let marker = label_dir.join(PROJECT_MARKER_DIR);
        fs::create_dir_all(&marker)
            .with_context(|| format!("Failed to create {}", marker.display()))?;

        let manifest = label_dir.join(MANIFEST_FILE);
        if manifest.exists() {
            tracing::debug!(path = %manifest.display(), "Project manifest already present");
            return Ok(());
        }

        let org_name = label_dir
            .file_name()
            .map(|name| templates::identifier(&name.to_string_lossy()))
            .unwrap_or_else(|| "micro_gw".to_string());
        let contents = self.templates.render(
            MANIFEST,
            &json!({ "org_name": org_name, "version": PROJECT_VERSION }),
        )?;
        templates::write_file(&manifest, &contents)?;

        tracing::info!(path = %label_dir.display(), "Initialized project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_writes_manifest_and_marker() {
        let temp = TempDir::new().unwrap();
        let label_dir = temp.path().join("orders-eu");
        fs::create_dir_all(&label_dir).unwrap();

        BallerinaProjectInitializer::new()
            .unwrap()
            .initialize(&label_dir)
            .unwrap();

        let manifest = fs::read_to_string(label_dir.join("Ballerina.toml")).unwrap();
        assert!(manifest.contains("org-name = \"orders_eu\""));
        assert!(label_dir.join(".ballerina").is_dir());
    }

    #[test]
    fn test_existing_manifest_is_kept() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Ballerina.toml"), "custom").unwrap();

        let initializer = BallerinaProjectInitializer::new().unwrap();
        initializer.initialize(temp.path()).unwrap();
        initializer.initialize(temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("Ballerina.toml")).unwrap(),
            "custom"
        );
    }

    #[test]
    fn test_missing_label_directory_fails() {
        let temp = TempDir::new().unwrap();

        let err = BallerinaProjectInitializer::new()
            .unwrap()
            .initialize(&temp.path().join("absent"))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
