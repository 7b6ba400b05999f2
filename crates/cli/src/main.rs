//! # Keystone Groups CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - JSON-lines 消息处理（经由 RouteHandle + GroupProducer）
//! - 运行摘要与 Prometheus 指标

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_messages, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: cli.metrics_port(),
        default_log_level: cli.log_level().to_string(),
        ignore_env_filter: cli.quiet,
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Keystone Groups CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_messages(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
