//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    host: String,
    default_operation: Option<String>,
    queue_capacity: usize,
    seeded_groups: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            error: Some(format!("File not found: {config_path}")),
            config_path,
            warnings: Vec::new(),
            summary: None,
        };
    }

    match config_loader::ConfigLoader::new().load_path(&args.config) {
        Ok(config) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(&config),
            summary: Some(ConfigSummary {
                version: format!("{:?}", config.version),
                host: config.endpoint.host.clone(),
                default_operation: config.endpoint.operation.map(|op| op.to_string()),
                queue_capacity: config.route.queue_capacity,
                seeded_groups: config.directory.groups.len(),
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(config: &contracts::KeystoneConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.endpoint.password.is_empty() {
        warnings.push("endpoint.password is empty".to_string());
    }
    if config.endpoint.operation.is_none() {
        warnings.push(
            "endpoint.operation not set - messages without an operation header will fault"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if !result.valid {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
        return;
    }

    println!("✓ Configuration is valid: {}", result.config_path);

    if let Some(ref summary) = result.summary {
        println!("\n  Version: {}", summary.version);
        println!("  Endpoint: {}", summary.host);
        println!(
            "  Default operation: {}",
            summary.default_operation.as_deref().unwrap_or("(none)")
        );
        println!("  Queue capacity: {}", summary.queue_capacity);
        println!("  Seeded groups: {}", summary.seeded_groups);
    }

    if !result.warnings.is_empty() {
        println!("\n⚠ Warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_config_with_warnings() {
        let file = config_file(
            r#"
[endpoint]
host = "http://keystone.local:5000/v3"
username = "admin"
project = "admin"
"#,
        );
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        });

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        let summary = result.summary.unwrap();
        assert_eq!(summary.queue_capacity, 64);
        assert_eq!(summary.default_operation, None);
    }

    #[test]
    fn test_invalid_config_reports_field() {
        let file = config_file(
            r#"
[endpoint]
host = "http://keystone.local:5000/v3"
username = ""
project = "admin"
"#,
        );
        let result = validate_config(&ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        });

        assert!(!result.valid);
        assert!(result.error.unwrap().contains("endpoint.username"));
    }
}
