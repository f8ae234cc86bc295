//! Workspace location and on-disk layout
//!
//! The workspace root is remembered in `<cli home>/temp/workspace.txt` so that
//! only the first `setup` needs `--path`. Under the root:
//!
//! ```text
//! <root>/conf/config.toml                global config
//! <root>/<label>/conf/label-config.toml  label config
//! <root>/<label>/src/                    generated sources
//! <root>/<label>/src/policies/           generated policies
//! <root>/<label>/target/                 distributions
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use mgw_runtime::config::{CLI_HOME_DIR, HOME_ENV_VAR, PROGRAM_NAME};
use mgw_runtime::{Result, WorkspaceError};

use crate::config::{GlobalConfig, LabelConfig};

const WORKSPACE_FILE: &str = "workspace.txt";
const TEMP_DIR: &str = "temp";
const CONF_DIR: &str = "conf";
const GLOBAL_CONFIG_FILE: &str = "config.toml";
const LABEL_CONFIG_FILE: &str = "label-config.toml";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WorkspaceError + '_ {
    move |source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn create_dir(path: &Path) -> std::result::Result<(), WorkspaceError> {
    fs::create_dir_all(path).map_err(io_error(path))
}

/// Directory holding CLI state outside any workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliHome {
    root: PathBuf,
}

impl CliHome {
    /// Use an explicit home directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$MICRO_GW_HOME`, or `~/.micro-gw`
    pub fn discover() -> std::result::Result<Self, WorkspaceError> {
        if let Some(home) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(Self::new(home));
        }
        let home = dirs::home_dir().ok_or(WorkspaceError::HomeUnavailable)?;
        Ok(Self::new(home.join(CLI_HOME_DIR)))
    }

    /// The home directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File remembering the workspace root
    pub fn workspace_file(&self) -> PathBuf {
        self.root.join(TEMP_DIR).join(WORKSPACE_FILE)
    }
}

/// Paths under a workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the global config
    pub fn conf_dir(&self) -> PathBuf {
        self.root.join(CONF_DIR)
    }

    /// The global config file
    pub fn global_config_path(&self) -> PathBuf {
        self.conf_dir().join(GLOBAL_CONFIG_FILE)
    }

    /// Layout of one label's project
    pub fn label(&self, label: &str) -> LabelLayout {
        LabelLayout {
            label: label.to_string(),
            dir: self.root.join(label),
        }
    }
}

/// Paths of one label's project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLayout {
    label: String,
    dir: PathBuf,
}

impl LabelLayout {
    /// Label name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Project directory of the label
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory of the label config
    pub fn conf_dir(&self) -> PathBuf {
        self.dir.join(CONF_DIR)
    }

    /// The label config file
    pub fn config_path(&self) -> PathBuf {
        self.conf_dir().join(LABEL_CONFIG_FILE)
    }

    /// Generated sources
    pub fn src_dir(&self) -> PathBuf {
        self.dir.join("src")
    }

    /// Generated policies
    pub fn policies_dir(&self) -> PathBuf {
        self.src_dir().join("policies")
    }

    /// Distributions
    pub fn target_dir(&self) -> PathBuf {
        self.dir.join("target")
    }

    /// The distribution archive `build` produces
    pub fn distribution_path(&self) -> PathBuf {
        self.target_dir()
            .join(format!("{PROGRAM_NAME}-{}.zip", self.label))
    }
}

/// Resolves, remembers and scaffolds the workspace
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    home: CliHome,
}

impl WorkspaceManager {
    /// Manager keeping its state under `home`
    pub const fn new(home: CliHome) -> Self {
        Self { home }
    }

    /// Determine the workspace root for this run.
    ///
    /// A non-blank `override_path` becomes the remembered root: it is made
    /// absolute, written to the workspace file, and the root is scaffolded
    /// with a global config if none exists yet. Otherwise the remembered root
    /// is used, and its absence is [`WorkspaceError::NoWorkspaceConfigured`].
    pub fn resolve_workspace_root(&self, override_path: Option<&str>) -> Result<WorkspaceLayout> {
        match override_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => self.adopt_workspace_root(Path::new(path)),
            None => Ok(WorkspaceLayout::new(
                self.stored_workspace_root()?
                    .ok_or(WorkspaceError::NoWorkspaceConfigured)?,
            )),
        }
    }

    /// The remembered workspace root, if any
    pub fn stored_workspace_root(&self) -> std::result::Result<Option<PathBuf>, WorkspaceError> {
        let file = self.home.workspace_file();
        if !file.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file).map_err(io_error(&file))?;
        let root = contents.trim();
        Ok((!root.is_empty()).then(|| PathBuf::from(root)))
    }

    fn adopt_workspace_root(&self, path: &Path) -> Result<WorkspaceLayout> {
        let root = std::path::absolute(path).map_err(io_error(path))?;
        let layout = WorkspaceLayout::new(&root);

        create_dir(&layout.conf_dir())?;

        let file = self.home.workspace_file();
        if let Some(parent) = file.parent() {
            create_dir(parent)?;
        }
        fs::write(&file, root.to_string_lossy().as_bytes()).map_err(io_error(&file))?;
        tracing::info!(root = %root.display(), "Workspace root updated");

        let config_path = layout.global_config_path();
        if !config_path.exists() {
            GlobalConfig::new(&config_path).persist()?;
            tracing::debug!(path = %config_path.display(), "Created global config");
        }

        Ok(layout)
    }

    /// Create the label's project tree and a default label config.
    ///
    /// Safe to call on every run; existing directories and config are kept.
    pub fn scaffold_label(&self, layout: &WorkspaceLayout, label: &str) -> Result<LabelLayout> {
        let label_layout = layout.label(label);

        for dir in [
            label_layout.conf_dir(),
            label_layout.policies_dir(),
            label_layout.target_dir(),
        ] {
            create_dir(&dir)?;
        }

        let config_path = label_layout.config_path();
        if !config_path.exists() {
            LabelConfig::new(&config_path).persist()?;
            tracing::debug!(path = %config_path.display(), "Created label config");
        }

        Ok(label_layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgw_runtime::CliError;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn snapshot(root: &Path) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .map(|entry| entry.unwrap().into_path())
            .collect();
        entries.sort();
        entries
    }

    fn manager(temp: &TempDir) -> WorkspaceManager {
        WorkspaceManager::new(CliHome::new(temp.path().join("home")))
    }

    #[test]
    fn test_no_stored_root_without_path() {
        let temp = TempDir::new().unwrap();

        let err = manager(&temp).resolve_workspace_root(None).unwrap_err();
        assert!(matches!(
            err,
            CliError::Workspace(WorkspaceError::NoWorkspaceConfigured)
        ));

        let err = manager(&temp).resolve_workspace_root(Some("  ")).unwrap_err();
        assert!(err.to_string().contains("--path"));
    }

    #[test]
    fn test_path_is_remembered() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        let manager = manager(&temp);

        let layout = manager
            .resolve_workspace_root(Some(root.to_str().unwrap()))
            .unwrap();
        assert_eq!(layout.root(), root);
        assert!(layout.global_config_path().exists());

        let again = manager.resolve_workspace_root(None).unwrap();
        assert_eq!(again, layout);
    }

    #[test]
    fn test_new_path_overwrites_remembered_root() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let first = temp.path().join("first");
        let second = temp.path().join("second");

        manager
            .resolve_workspace_root(Some(first.to_str().unwrap()))
            .unwrap();
        manager
            .resolve_workspace_root(Some(second.to_str().unwrap()))
            .unwrap();

        assert_eq!(manager.stored_workspace_root().unwrap(), Some(second));
    }

    #[test]
    fn test_existing_global_config_is_kept() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        let manager = manager(&temp);

        let layout = manager
            .resolve_workspace_root(Some(root.to_str().unwrap()))
            .unwrap();
        let mut config = GlobalConfig::load(&layout.global_config_path()).unwrap();
        config.token.client_id = "kept-id".to_string();
        config.token.client_secret = "kept-secret".to_string();
        config.persist().unwrap();

        manager
            .resolve_workspace_root(Some(root.to_str().unwrap()))
            .unwrap();

        let config = GlobalConfig::load(&layout.global_config_path()).unwrap();
        assert_eq!(config.token.client_id, "kept-id");
    }

    #[test]
    fn test_scaffold_label_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        let manager = manager(&temp);
        let layout = manager
            .resolve_workspace_root(Some(root.to_str().unwrap()))
            .unwrap();

        let first = manager.scaffold_label(&layout, "orders").unwrap();
        let before = snapshot(&root);
        let second = manager.scaffold_label(&layout, "orders").unwrap();
        let after = snapshot(&root);

        assert_eq!(first, second);
        assert_eq!(before, after);
        assert!(first.config_path().exists());
        assert!(first.policies_dir().is_dir());
        assert!(first.target_dir().is_dir());
    }

    #[test]
    fn test_scaffold_keeps_edited_label_config() {
        let temp = TempDir::new().unwrap();
        let layout = WorkspaceLayout::new(temp.path().join("ws"));
        let manager = manager(&temp);

        let label = manager.scaffold_label(&layout, "orders").unwrap();
        let mut config = LabelConfig::load(&label.config_path()).unwrap();
        config.gateway.http_port = 8080;
        config.persist().unwrap();

        manager.scaffold_label(&layout, "orders").unwrap();

        let config = LabelConfig::load(&label.config_path()).unwrap();
        assert_eq!(config.gateway.http_port, 8080);
    }

    #[test]
    fn test_distribution_path_names_the_label() {
        let layout = WorkspaceLayout::new("/ws").label("orders");
        assert_eq!(
            layout.distribution_path(),
            PathBuf::from("/ws/orders/target/micro-gw-orders.zip")
        );
    }
}
