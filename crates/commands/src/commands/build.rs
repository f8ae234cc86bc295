//! Build command: package a label project into a distribution

use std::path::PathBuf;
use std::sync::Arc;

use mgw_codegen::ZipDistributionPackager;
use mgw_common::{CliHome, RealUserInterface, WorkspaceManager};
use mgw_runtime::deps::{DistributionPackager, MessageStyle, UserInterface};
use mgw_runtime::{CliError, Result, WorkspaceError};

use crate::commands::require_label;

/// Build command arguments (matches CLI parser)
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    /// Label to package
    pub label: Option<String>,
}

/// Dependencies for the build command
pub struct BuildDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// Resolves the remembered workspace root
    pub workspace: WorkspaceManager,
    /// Distribution packager
    pub packager: Arc<dyn DistributionPackager>,
}

/// Execute the build command with injected dependencies
pub fn execute_with_deps(args: &BuildArgs, deps: &Arc<BuildDependencies>) -> Result<PathBuf> {
    let label = require_label(args.label.as_deref())?;
    let workspace = deps.workspace.resolve_workspace_root(None)?;

    deps.ui.print_styled(
        &format!("→ Building micro gateway distribution for label '{label}'"),
        MessageStyle::Cyan,
    );

    let archive = deps
        .packager
        .package(workspace.root(), label)
        .map_err(|source| CliError::Distribution {
            label: label.to_string(),
            source,
        })?;

    deps.ui.print_styled(
        &format!("✓ Distribution created at {}", archive.display()),
        MessageStyle::Success,
    );
    Ok(archive)
}

/// Execute the build command with default dependencies
pub fn execute(args: &BuildArgs) -> Result<()> {
    execute_in_home(args, CliHome::discover)
}

// The label is checked before the CLI home is looked up
fn execute_in_home(
    args: &BuildArgs,
    discover_home: impl FnOnce() -> std::result::Result<CliHome, WorkspaceError>,
) -> Result<()> {
    require_label(args.label.as_deref())?;

    let deps = Arc::new(BuildDependencies {
        ui: Arc::new(RealUserInterface),
        workspace: WorkspaceManager::new(discover_home()?),
        packager: Arc::new(ZipDistributionPackager),
    });

    execute_with_deps(args, &deps).map(|_| ())
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
