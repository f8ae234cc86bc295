//! Command implementations

use std::path::{Component, Path};

use mgw_runtime::UsageError;

pub mod build;
pub mod run;
pub mod setup;

/// The trimmed label, checked to be a single directory name under the
/// workspace root
///
/// Blank labels are [`UsageError::LabelRequired`]; `.`, `..` and anything
/// with a path separator are [`UsageError::InvalidLabel`].
pub fn require_label(label: Option<&str>) -> Result<&str, UsageError> {
    let label = label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or(UsageError::LabelRequired)?;

    let mut components = Path::new(label).components();
    let single_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_name || label.contains(['/', '\\', '\0']) {
        return Err(UsageError::InvalidLabel(label.to_string()));
    }
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_trimmed() {
        assert_eq!(require_label(Some("  orders ")), Ok("orders"));
        assert_eq!(require_label(Some("orders.v2")), Ok("orders.v2"));
    }

    #[test]
    fn test_blank_label_is_required() {
        assert_eq!(require_label(None), Err(UsageError::LabelRequired));
        assert_eq!(require_label(Some(" \t")), Err(UsageError::LabelRequired));
    }

    #[test]
    fn test_path_like_labels_are_rejected() {
        for label in [
            ".",
            "..",
            "../escaped",
            "nested/label",
            "nested\\label",
            "/tmp/abs",
            "orders/",
        ] {
            assert_eq!(
                require_label(Some(label)),
                Err(UsageError::InvalidLabel(label.to_string())),
                "label {label:?} should be rejected"
            );
        }
    }
}
