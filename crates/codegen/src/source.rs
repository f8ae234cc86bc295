//! API service source generation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mgw_common::WorkspaceLayout;
use mgw_runtime::deps::SourceGenerator;
use mgw_runtime::model::ApiDefinition;

use crate::templates::{self, SERVICE, Templates};

/// The part of a published endpoint configuration the gateway forwards to
#[derive(Debug, Deserialize)]
struct EndpointConfig {
    production_endpoints: Option<Endpoint>,
    sandbox_endpoints: Option<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    url: String,
}

fn endpoint_url(api: &ApiDefinition) -> Result<String> {
    let Some(raw) = api.endpoint_config.as_deref().filter(|c| !c.trim().is_empty()) else {
        return Ok(String::new());
    };

    let config: EndpointConfig = serde_json::from_str(raw)
        .with_context(|| format!("Invalid endpoint configuration for API '{}'", api.name))?;

    Ok(config
        .production_endpoints
        .or(config.sandbox_endpoints)
        .map(|endpoint| endpoint.url)
        .unwrap_or_default())
}

#[derive(Debug, Serialize)]
struct ServiceView<'a> {
    label: &'a str,
    service_name: String,
    name: &'a str,
    version: &'a str,
    provider: &'a str,
    context: String,
    endpoint_url: String,
    tiers: &'a [String],
}

/// Renders one service source file per API into the label's `src/`
pub struct ServiceSourceGenerator {
    templates: Templates,
}

impl ServiceSourceGenerator {
    /// Create a generator with the built-in templates
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: Templates::new()?,
        })
    }

    /// File name of the generated service for `api`
    pub fn file_name(api: &ApiDefinition) -> String {
        format!(
            "{}.bal",
            templates::identifier(&format!("{}_{}", api.name, api.version))
        )
    }

    fn render(&self, label: &str, api: &ApiDefinition) -> Result<String> {
        let view = ServiceView {
            label,
            service_name: templates::identifier(&format!("{}_{}", api.name, api.version)),
            name: &api.name,
            version: &api.version,
            provider: &api.provider,
            context: format!("/{}", api.context.trim_matches('/')),
            endpoint_url: endpoint_url(api)?,
            tiers: &api.tiers,
        };
        self.templates.render(SERVICE, &view)
    }
}

impl SourceGenerator for ServiceSourceGenerator {
    fn generate(
        &self,
        project_root: &Path,
        label: &str,
        apis: &[ApiDefinition],
        overwrite: bool,
    ) -> Result<()> {
        templates::ensure_unique_files(
            "APIs",
            apis.iter()
                .map(|api| (Self::file_name(api), format!("{} {}", api.name, api.version))),
        )?;

        let src_dir: PathBuf = WorkspaceLayout::new(project_root).label(label).src_dir();
        std::fs::create_dir_all(&src_dir)
            .with_context(|| format!("Failed to create {}", src_dir.display()))?;

        for api in apis {
            let path = src_dir.join(Self::file_name(api));
            if !overwrite && path.exists() {
                tracing::debug!(path = %path.display(), "Keeping existing source");
                continue;
            }

            let contents = self.render(label, api)?;
            templates::write_file(&path, &contents)?;
            tracing::debug!(api = %api.name, path = %path.display(), "Wrote service source");
        }

        tracing::info!(count = apis.len(), %label, "Generated API sources");
        Ok(())
    }
}
