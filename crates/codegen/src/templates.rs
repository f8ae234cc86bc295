//! Handlebars templates for generated artifacts

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use handlebars::Handlebars;
use serde::Serialize;

pub const POLICY: &str = "policy";
pub const SERVICE: &str = "service";
pub const MANIFEST: &str = "manifest";

const POLICY_TEMPLATE: &str = r#"// Generated by micro-gw. Re-running setup overwrites this file.

@Description {value:"{{scope}} throttle policy {{policy_name}}: {{description}}"}
public function {{function_name}}() returns (ThrottlePolicy) {
    return {
        name: "{{policy_name}}",
        scope: "{{scope}}",
        limitType: "{{limit_type}}",
        requestCount: {{request_count}},
        unitTimeMillis: {{unit_time_millis}},
        stopOnQuotaReach: {{stop_on_quota_reach}}
    };
}
"#;

const SERVICE_TEMPLATE: &str = r#"// Generated by micro-gw for label {{label}}. Re-running setup overwrites this file.
import ballerina/http;

endpoint http:Client {{service_name}}_ep {
    url: "{{endpoint_url}}"
};

@http:ServiceConfig {
    basePath: "{{context}}/{{version}}"
}
service<http:Service> {{service_name}} bind apiListener {
    // API {{name}} {{version}} by {{provider}}
    // Tiers: {{#each tiers}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}

    @http:ResourceConfig {
        path: "/*"
    }
    forward(endpoint caller, http:Request req) {
        var response = {{service_name}}_ep->forward(untaint req.rawPath, req);
        match response {
            http:Response res => {
                _ = caller->respond(res);
            }
            error err => {
                http:Response res = new;
                res.statusCode = 502;
                res.setPayload(err.message);
                _ = caller->respond(res);
            }
        }
    }
}
"#;

const MANIFEST_TEMPLATE: &str = r#"[project]
org-name = "{{org_name}}"
version = "{{version}}"
"#;

/// Registered templates, rendered without HTML escaping
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(POLICY, POLICY_TEMPLATE)
            .context("Invalid policy template")?;
        registry
            .register_template_string(SERVICE, SERVICE_TEMPLATE)
            .context("Invalid service template")?;
        registry
            .register_template_string(MANIFEST, MANIFEST_TEMPLATE)
            .context("Invalid manifest template")?;

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.registry
            .render(name, data)
            .with_context(|| format!("Failed to render {name} template"))
    }
}

/// Lower-case identifier built from the alphanumeric runs of `name`
pub fn identifier(name: &str) -> String {
    let ident = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    match ident.chars().next() {
        None => "unnamed".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident,
    }
}

/// Fail when two sources map to the same generated file
///
/// `files` pairs each generated file name with the name of what it was
/// generated from.
pub fn ensure_unique_files<I>(kind: &str, files: I) -> Result<()>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut seen = HashMap::new();
    for (file, source) in files {
        match seen.entry(file) {
            Entry::Occupied(entry) => bail!(
                "{kind} '{}' and '{source}' both generate {}",
                entry.get(),
                entry.key()
            ),
            Entry::Vacant(entry) => {
                entry.insert(source);
            }
        }
    }
    Ok(())
}

/// Write `contents`, creating parent directories
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_normalizes_names() {
        assert_eq!(identifier("PizzaShack API"), "pizzashack_api");
        assert_eq!(identifier("10PerMin"), "_10permin");
        assert_eq!(identifier("--"), "unnamed");
        assert_eq!(identifier("Orders-v2.1"), "orders_v2_1");
    }

    #[test]
    fn test_templates_render_without_escaping() {
        let templates = Templates::new().unwrap();
        let rendered = templates
            .render(
                MANIFEST,
                &json!({"org_name": "a<b>", "version": "0.0.1"}),
            )
            .unwrap();
        assert!(rendered.contains("org-name = \"a<b>\""));
    }

    #[test]
    fn test_missing_field_fails_in_strict_mode() {
        let templates = Templates::new().unwrap();
        assert!(templates.render(MANIFEST, &json!({})).is_err());
    }
}
