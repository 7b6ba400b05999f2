//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::KeystoneConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

const REDACTED: &str = "********";

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    endpoint: EndpointInfo,
    queue_capacity: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupInfo>,
}

#[derive(Serialize)]
struct EndpointInfo {
    host: String,
    username: String,
    password: &'static str,
    project: String,
    domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
}

#[derive(Serialize)]
struct GroupInfo {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain_id: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::new().load_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &KeystoneConfig) -> ConfigInfo {
    let endpoint = &config.endpoint;

    ConfigInfo {
        version: format!("{:?}", config.version),
        endpoint: EndpointInfo {
            host: endpoint.host.clone(),
            username: endpoint.username.clone(),
            password: if endpoint.password.is_empty() { "" } else { REDACTED },
            project: endpoint.project.clone(),
            domain: endpoint.domain.clone(),
            operation: endpoint.operation.map(|op| op.to_string()),
        },
        queue_capacity: config.route.queue_capacity,
        groups: config
            .directory
            .groups
            .iter()
            .map(|seed| GroupInfo {
                name: seed.name.clone(),
                description: seed.description.clone(),
                domain_id: seed.domain_id.clone(),
            })
            .collect(),
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Keystone Groups Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let endpoint = &info.endpoint;
    println!("🔑 Endpoint");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Host: {}", endpoint.host);
    println!("   ├─ User: {}@{} ({})", endpoint.username, endpoint.project, endpoint.domain);
    println!("   ├─ Password: {}", if endpoint.password.is_empty() { "(empty)" } else { endpoint.password });
    println!(
        "   └─ Default operation: {}",
        endpoint.operation.as_deref().unwrap_or("(none)")
    );

    println!("\n⚙️  Route");
    println!("   └─ Queue capacity: {}", info.queue_capacity);

    if !info.groups.is_empty() {
        println!("\n👥 Seeded groups ({})", info.groups.len());
        for (i, group) in info.groups.iter().enumerate() {
            let prefix = if i == info.groups.len() - 1 { "└─" } else { "├─" };
            println!(
                "   {} {} [{}] {}",
                prefix,
                group.name,
                group.domain_id.as_deref().unwrap_or("-"),
                group.description.as_deref().unwrap_or("")
            );
        }
    }

    println!();
}
