//! Ordered generation of artifacts from fetched definitions
//!
//! Stages run in a fixed order and the first failure stops the pipeline.
//! Nothing written by earlier stages is rolled back; every stage overwrites
//! its output, so re-running `setup` repairs a partial run.

use std::path::Path;

use mgw_common::LabelLayout;
use mgw_runtime::deps::{
    MessageStyle, PolicyGenerator, ProjectInitializer, SourceGenerator, UserInterface,
};
use mgw_runtime::{CliError, PipelineStage, RemoteDefinitions, Result};

/// Where a pipeline run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing generated yet
    Pending,
    /// Policies written
    PolicyGenerated,
    /// Sources written
    SourceGenerated,
    /// Project initialized; the run is complete
    Initialized,
    /// A stage failed; no further stages run
    Failed(PipelineStage),
}

impl PipelineState {
    /// The stage to run next, if any
    pub const fn next_stage(self) -> Option<PipelineStage> {
        match self {
            Self::Pending => Some(PipelineStage::PolicyGeneration),
            Self::PolicyGenerated => Some(PipelineStage::SourceGeneration),
            Self::SourceGenerated => Some(PipelineStage::ProjectInitialization),
            Self::Initialized | Self::Failed(_) => None,
        }
    }

    /// State reached once `stage` has succeeded
    pub const fn completed(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::PolicyGeneration => Self::PolicyGenerated,
            PipelineStage::SourceGeneration => Self::SourceGenerated,
            PipelineStage::ProjectInitialization => Self::Initialized,
        }
    }
}

/// Runs the generators against one label
pub struct GenerationPipeline<'a> {
    ui: &'a dyn UserInterface,
    policy_generator: &'a dyn PolicyGenerator,
    source_generator: &'a dyn SourceGenerator,
    project_initializer: &'a dyn ProjectInitializer,
    state: PipelineState,
}

impl<'a> GenerationPipeline<'a> {
    /// A pending pipeline
    pub fn new(
        ui: &'a dyn UserInterface,
        policy_generator: &'a dyn PolicyGenerator,
        source_generator: &'a dyn SourceGenerator,
        project_initializer: &'a dyn ProjectInitializer,
    ) -> Self {
        Self {
            ui,
            policy_generator,
            source_generator,
            project_initializer,
            state: PipelineState::Pending,
        }
    }

    /// Current state
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Run every remaining stage, consuming the fetched definitions
    pub fn run(
        &mut self,
        workspace_root: &Path,
        label: &LabelLayout,
        definitions: RemoteDefinitions,
    ) -> Result<PipelineState> {
        let RemoteDefinitions {
            apis,
            application_policies,
            subscription_policies,
        } = definitions;

        while let Some(stage) = self.state.next_stage() {
            tracing::debug!(%stage, label = label.label(), "Running stage");

            let result = match stage {
                PipelineStage::PolicyGeneration => {
                    self.ui.print("→ Generating throttle policies");
                    self.policy_generator.generate(
                        &label.policies_dir(),
                        &application_policies,
                        &subscription_policies,
                    )
                }
                PipelineStage::SourceGeneration => {
                    self.ui.print(&format!("→ Generating sources for {} API(s)", apis.len()));
                    self.source_generator
                        .generate(workspace_root, label.label(), &apis, true)
                }
                PipelineStage::ProjectInitialization => {
                    self.ui.print("→ Initializing project");
                    self.project_initializer.initialize(label.dir())
                }
            };

            if let Err(source) = result {
                self.state = PipelineState::Failed(stage);
                self.ui
                    .print_styled(&format!("✗ {stage} failed"), MessageStyle::Error);
                return Err(CliError::Generation { stage, source });
            }

            self.state = PipelineState::completed(stage);
            tracing::info!(%stage, "Stage completed");
        }

        Ok(self.state)
    }
}
