//! Throttle policy generation

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use mgw_runtime::deps::PolicyGenerator;
use mgw_runtime::model::ThrottlePolicy;

use crate::templates::{self, POLICY, Templates};

#[derive(Debug, Serialize)]
struct PolicyView<'a> {
    scope: &'static str,
    policy_name: &'a str,
    description: &'a str,
    function_name: String,
    limit_type: &'a str,
    request_count: u64,
    unit_time_millis: u64,
    stop_on_quota_reach: bool,
}

fn unit_millis(time_unit: &str) -> u64 {
    match time_unit.to_ascii_lowercase().as_str() {
        "sec" | "second" | "seconds" => 1_000,
        "hour" | "hours" => 3_600_000,
        "day" | "days" => 86_400_000,
        "month" | "months" => 2_592_000_000,
        "year" | "years" => 31_536_000_000,
        // minutes are the management API default
        _ => 60_000,
    }
}

impl<'a> PolicyView<'a> {
    fn new(scope: &'static str, policy: &'a ThrottlePolicy) -> Result<Self> {
        let limit = policy.default_limit.as_ref();
        let count = limit.and_then(|l| l.request_count_limit.as_ref());
        let unit_time_millis = match count {
            Some(c) => c
                .unit_time
                .checked_mul(unit_millis(&c.time_unit))
                .with_context(|| {
                    format!(
                        "Unit time {} {} of {scope} policy '{}' is too large",
                        c.unit_time, c.time_unit, policy.policy_name
                    )
                })?,
            None => 0,
        };

        Ok(Self {
            scope,
            policy_name: &policy.policy_name,
            description: &policy.description,
            function_name: format!("{scope}_{}", templates::identifier(&policy.policy_name)),
            limit_type: limit.map_or("RequestCountLimit", |l| l.limit_type.as_str()),
            request_count: count.map_or(0, |c| c.request_count),
            unit_time_millis,
            stop_on_quota_reach: policy.stop_on_quota_reach.unwrap_or(true),
        })
    }

    fn file_name(&self) -> String {
        format!("{}.bal", self.function_name)
    }
}

/// Renders one `.bal` file per throttle policy
pub struct ThrottlePolicyGenerator {
    templates: Templates,
}

impl ThrottlePolicyGenerator {
    /// Create a generator with the built-in templates
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: Templates::new()?,
        })
    }
}

impl PolicyGenerator for ThrottlePolicyGenerator {
    fn generate(
        &self,
        output_dir: &Path,
        application_policies: &[ThrottlePolicy],
        subscription_policies: &[ThrottlePolicy],
    ) -> Result<()> {
        let views = application_policies
            .iter()
            .map(|policy| PolicyView::new("application", policy))
            .chain(
                subscription_policies
                    .iter()
                    .map(|policy| PolicyView::new("subscription", policy)),
            )
            .collect::<Result<Vec<_>>>()?;
        templates::ensure_unique_files(
            "Throttle policies",
            views
                .iter()
                .map(|view| (view.file_name(), view.policy_name.to_string())),
        )?;

        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        for view in &views {
            let path = output_dir.join(view.file_name());
            let contents = self.templates.render(POLICY, view)?;
            templates::write_file(&path, &contents)?;
            tracing::debug!(policy = %view.policy_name, path = %path.display(), "Wrote policy");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgw_runtime::model::{RequestCountLimit, ThrottleLimit};
    use std::fs;
    use tempfile::TempDir;

    fn policy(name: &str, count: u64, unit: &str) -> ThrottlePolicy {
        ThrottlePolicy {
            policy_id: String::new(),
            policy_name: name.to_string(),
            display_name: name.to_string(),
            description: format!("Allows {count} requests per {unit}"),
            default_limit: Some(ThrottleLimit {
                limit_type: "RequestCountLimit".to_string(),
                request_count_limit: Some(RequestCountLimit {
                    time_unit: unit.to_string(),
                    unit_time: 1,
                    request_count: count,
                }),
            }),
            stop_on_quota_reach: None,
        }
    }

    #[test]
    fn test_one_file_per_policy() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("src/policies");
        let generator = ThrottlePolicyGenerator::new().unwrap();

        generator
            .generate(
                &out,
                &[policy("10PerMin", 10, "min"), policy("Unlimited", 0, "min")],
                &[policy("Gold", 5000, "hour")],
            )
            .unwrap();

        let app = fs::read_to_string(out.join("application__10permin.bal")).unwrap();
        assert!(app.contains("requestCount: 10,"));
        assert!(app.contains("unitTimeMillis: 60000,"));
        assert!(out.join("application_unlimited.bal").exists());

        let gold = fs::read_to_string(out.join("subscription_gold.bal")).unwrap();
        assert!(gold.contains("unitTimeMillis: 3600000,"));
        assert!(gold.contains("scope: \"subscription\""));
    }

    #[test]
    fn test_empty_policy_lists_create_only_the_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("policies");

        ThrottlePolicyGenerator::new()
            .unwrap()
            .generate(&out, &[], &[])
            .unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_rerun_overwrites() {
        let temp = TempDir::new().unwrap();
        let generator = ThrottlePolicyGenerator::new().unwrap();

        generator
            .generate(temp.path(), &[policy("Bronze", 1, "min")], &[])
            .unwrap();
        generator
            .generate(temp.path(), &[policy("Bronze", 2, "min")], &[])
            .unwrap();

        let contents = fs::read_to_string(temp.path().join("application_bronze.bal")).unwrap();
        assert!(contents.contains("requestCount: 2,"));
    }

    #[test]
    fn test_unit_time_overflow_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut huge = policy("Forever", 1, "year");
        if let Some(count) = huge
            .default_limit
            .as_mut()
            .and_then(|l| l.request_count_limit.as_mut())
        {
            count.unit_time = u64::MAX;
        }

        let err = ThrottlePolicyGenerator::new()
            .unwrap()
            .generate(temp.path(), &[], &[huge])
            .unwrap_err();

        assert!(err.to_string().contains("'Forever' is too large"));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_colliding_policy_names_are_rejected() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("policies");

        let err = ThrottlePolicyGenerator::new()
            .unwrap()
            .generate(
                &out,
                &[],
                &[policy("Gold", 5000, "hour"), policy("gold", 10, "min")],
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Throttle policies 'Gold' and 'gold' both generate subscription_gold.bal"
        );
        assert!(!out.exists());
    }

    #[test]
    fn test_same_name_in_both_scopes_is_allowed() {
        let temp = TempDir::new().unwrap();

        ThrottlePolicyGenerator::new()
            .unwrap()
            .generate(
                temp.path(),
                &[policy("Gold", 1, "min")],
                &[policy("Gold", 2, "min")],
            )
            .unwrap();

        assert!(temp.path().join("application_gold.bal").exists());
        assert!(temp.path().join("subscription_gold.bal").exists());
    }

    #[test]
    fn test_unwritable_output_dir_names_the_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("policies");
        fs::write(&blocker, "not a directory").unwrap();

        let err = ThrottlePolicyGenerator::new()
            .unwrap()
            .generate(&blocker.join("nested"), &[policy("Gold", 1, "min")], &[])
            .unwrap_err();

        assert!(err.to_string().contains("nested"));
    }
}
