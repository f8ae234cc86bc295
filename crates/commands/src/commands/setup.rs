//! Setup command: bootstrap a label project from the management API

use std::sync::Arc;
use std::time::Duration;

use mgw_codegen::{BallerinaProjectInitializer, ServiceSourceGenerator, ThrottlePolicyGenerator};
use mgw_common::{CliHome, GlobalConfig, LabelConfig, RealUserInterface, WorkspaceManager};
use mgw_runtime::deps::{
    MessageStyle, PolicyGenerator, ProjectInitializer, RealRemoteServicesFactory,
    RemoteServicesFactory, SourceGenerator, UserInterface,
};
use mgw_runtime::{CliError, ConfigError, PipelineStage, Result, WorkspaceError};

use crate::commands::require_label;
use crate::credentials::{self, CredentialRequest};
use crate::fetch;
use crate::pipeline::{GenerationPipeline, PipelineState};

/// Setup command arguments (matches CLI parser)
#[derive(Debug, Clone, Default)]
pub struct SetupArgs {
    /// Label to set up
    pub label: Option<String>,
    /// New workspace root
    pub path: Option<String>,
    /// Operator username
    pub user: Option<String>,
    /// Operator password
    pub password: Option<String>,
    /// Forget the cached client and username first
    pub reset: bool,
}

/// Dependencies for the setup command
pub struct SetupDependencies {
    /// User interface for output and prompts
    pub ui: Arc<dyn UserInterface>,
    /// Workspace resolution and scaffolding
    pub workspace: WorkspaceManager,
    /// Builds the credential issuer and management API client
    pub remote: Arc<dyn RemoteServicesFactory>,
    /// Throttle policy generator
    pub policy_generator: Arc<dyn PolicyGenerator>,
    /// API source generator
    pub source_generator: Arc<dyn SourceGenerator>,
    /// Project initializer
    pub project_initializer: Arc<dyn ProjectInitializer>,
}

/// Execute the setup command with injected dependencies
pub async fn execute_with_deps(
    args: SetupArgs,
    deps: Arc<SetupDependencies>,
) -> Result<PipelineState> {
    let label = require_label(args.label.as_deref())?;

    let workspace = deps
        .workspace
        .resolve_workspace_root(args.path.as_deref())?;
    let label_layout = deps.workspace.scaffold_label(&workspace, label)?;
    let label_config = LabelConfig::load(&label_layout.config_path())?;
    tracing::debug!(
        %label,
        http_port = label_config.gateway.http_port,
        https_port = label_config.gateway.https_port,
        "Label config loaded"
    );

    deps.ui.print_styled(
        &format!("→ Setting up micro gateway for label '{label}'"),
        MessageStyle::Cyan,
    );

    let mut global = GlobalConfig::load(&workspace.global_config_path())?;
    if args.reset {
        global.token.clear_client_credentials();
        global.persist()?;
        deps.ui
            .print_styled("Cached client credentials cleared", MessageStyle::Warning);
    }

    let trust = global.token.trust_settings(workspace.root());
    let services = deps
        .remote
        .connect(&global.token.endpoints(), &trust)
        .map_err(|source| ConfigError::TrustStore { source })?;

    let acquired = credentials::acquire(
        deps.ui.as_ref(),
        services.issuer.as_ref(),
        &global.token,
        CredentialRequest {
            user: args.user.as_deref(),
            password: args.password.as_deref(),
        },
    )
    .await?;

    let spinner = deps.ui.create_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(&format!("Fetching APIs and policies for label '{label}'..."));
    let fetched =
        fetch::fetch_definitions(services.management_api.as_ref(), label, &acquired.token).await;
    spinner.finish_and_clear();
    let definitions = fetched?;

    deps.ui.print(&format!(
        "Fetched {} API(s), {} application and {} subscription policies",
        definitions.apis.len(),
        definitions.application_policies.len(),
        definitions.subscription_policies.len()
    ));

    if acquired.needs_caching() {
        acquired.cache_into(&mut global.token);
        global.persist()?;
        tracing::debug!("Cached credentials updated");
    }

    let mut pipeline = GenerationPipeline::new(
        deps.ui.as_ref(),
        deps.policy_generator.as_ref(),
        deps.source_generator.as_ref(),
        deps.project_initializer.as_ref(),
    );
    let state = pipeline.run(workspace.root(), &label_layout, definitions)?;

    deps.ui.print("");
    deps.ui.print_styled(
        &format!(
            "✓ Micro gateway project for label '{label}' generated at {}",
            label_layout.dir().display()
        ),
        MessageStyle::Success,
    );

    Ok(state)
}

fn generation_error(stage: PipelineStage) -> impl FnOnce(anyhow::Error) -> CliError {
    move |source| CliError::Generation { stage, source }
}

/// Execute the setup command with default dependencies
pub async fn execute(args: SetupArgs) -> Result<()> {
    execute_in_home(args, CliHome::discover).await
}

// The label is checked before the CLI home is looked up
async fn execute_in_home(
    args: SetupArgs,
    discover_home: impl FnOnce() -> std::result::Result<CliHome, WorkspaceError>,
) -> Result<()> {
    require_label(args.label.as_deref())?;

    let deps = Arc::new(SetupDependencies {
        ui: Arc::new(RealUserInterface),
        workspace: WorkspaceManager::new(discover_home()?),
        remote: Arc::new(RealRemoteServicesFactory),
        policy_generator: Arc::new(
            ThrottlePolicyGenerator::new()
                .map_err(generation_error(PipelineStage::PolicyGeneration))?,
        ),
        source_generator: Arc::new(
            ServiceSourceGenerator::new()
                .map_err(generation_error(PipelineStage::SourceGeneration))?,
        ),
        project_initializer: Arc::new(
            BallerinaProjectInitializer::new()
                .map_err(generation_error(PipelineStage::ProjectInitialization))?,
        ),
    });

    execute_with_deps(args, deps).await.map(|_| ())
}

#[cfg(test)]
#[path = "setup_tests.rs"]
mod tests;
