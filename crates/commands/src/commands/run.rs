//! Run command
//!
//! Only validates its arguments; running a gateway from a label project is
//! not implemented yet.

use mgw_runtime::Result;

use crate::commands::require_label;

/// Run command arguments (matches CLI parser)
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Label to run
    pub label: Option<String>,
}

/// Execute the run command
pub fn execute(args: &RunArgs) -> Result<()> {
    let label = require_label(args.label.as_deref())?;
    tracing::debug!(%label, "Nothing to run");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgw_runtime::{CliError, UsageError};

    #[test]
    fn test_run_accepts_a_label() {
        let args = RunArgs {
            label: Some("orders".to_string()),
        };
        assert!(execute(&args).is_ok());
    }

    #[test]
    fn test_run_requires_a_label() {
        for label in [None, Some(String::new()), Some("   ".to_string())] {
            let err = execute(&RunArgs { label }).unwrap_err();
            assert!(matches!(err, CliError::Usage(UsageError::LabelRequired)));
        }
    }

    #[test]
    fn test_run_rejects_path_like_labels() {
        for label in ["..", "../escaped", "a/b"] {
            let err = execute(&RunArgs {
                label: Some(label.to_string()),
            })
            .unwrap_err();
            assert!(matches!(err, CliError::Usage(UsageError::InvalidLabel(_))));
        }
    }
}
