//! `validate` - report field-path validation errors for a configuration.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use customizer_core::codec;
use customizer_core::validate::validate_blocks;

/// Validation report: the printable text and whether the configuration is
/// persistable.
pub struct Report {
    pub text: String,
    pub valid: bool,
}

/// Read and validate a configuration file.
pub fn run(config_path: &Path) -> anyhow::Result<Report> {
    let config_json = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    Ok(check(&config_json))
}

fn check(config_json: &str) -> Report {
    let blocks = codec::parse_blocks(config_json);
    let errors = validate_blocks(&blocks);

    if errors.is_empty() {
        return Report {
            text: format!("Configuration is valid ({} blocks)", blocks.len()),
            valid: true,
        };
    }

    let mut text = format!("Configuration has {} error(s):", errors.len());
    for (path, message) in &errors {
        let _ = write!(text, "\n  {path}: {message}");
    }
    Report { text, valid: false }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_configuration() {
        let report = check(
            r#"[{"type": "config", "enabled": true},
                {"type": "area", "id": "size", "title": "Size", "enabled": true}]"#,
        );
        assert!(report.valid);
        assert!(report.text.contains("valid"));
    }

    #[test]
    fn test_invalid_configuration_lists_field_paths() {
        let report = check(r#"[{"type": "picker", "id": "", "title": "", "options": []}]"#);
        assert!(!report.valid);
        assert!(report.text.contains("0-id: Id is required"));
        assert!(report.text.contains("0-options: At least one option is required"));
    }
}
