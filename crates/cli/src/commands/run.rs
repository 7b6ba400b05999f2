//! `run` command implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{headers, GroupSeed, KeystoneConfig, Message};
use identity_client::InMemoryGroupService;
use observability::{OperationStatsAggregator, Outcome};
use producer::{GroupProducer, RouteHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;

const ROUTE_NAME: &str = "keystone-groups";

/// Execute the `run` command
pub async fn run_messages(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;

    let service = Arc::new(InMemoryGroupService::new());
    let seeded = service
        .seed(config.directory.groups.iter().map(GroupSeed::to_group))
        .context("Failed to seed in-memory directory")?;

    info!(
        host = %config.endpoint.host,
        default_operation = ?config.endpoint.operation,
        queue_capacity = config.route.queue_capacity,
        seeded = seeded.len(),
        "Configuration loaded"
    );

    let producer = GroupProducer::from_endpoint(Arc::clone(&service), &config.endpoint);
    let route = RouteHandle::spawn(ROUTE_NAME, producer, config.route.queue_capacity);

    let reader = open_input(&args.input).await?;
    let mut stdout = tokio::io::stdout();

    let stats = tokio::select! {
        result = process_lines(&route, reader, &mut stdout) => Some(result?),
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping...");
            None
        }
    };

    let snapshot = route.metrics().snapshot();
    route.shutdown().await;

    info!(
        processed = snapshot.processed_count,
        faults = snapshot.fault_count,
        groups = service.group_count(),
        "Route finished"
    );
    if let Some(stats) = stats {
        eprint!("{}", stats.summary());
    }

    Ok(())
}

fn load_config(args: &RunArgs) -> Result<KeystoneConfig> {
    let path = args.config.as_path();
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    let mut loader = ConfigLoader::new();
    if let Some(operation) = args.operation.as_deref() {
        info!(operation = %operation, "Overriding default operation from CLI");
        loader = loader.with_operation(operation).map_err(CliError::from)?;
    }
    if let Some(capacity) = args.queue_capacity {
        info!(queue_capacity = capacity, "Overriding queue capacity from CLI");
        loader = loader.with_queue_capacity(capacity);
    }

    loader
        .load_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

async fn open_input(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Feed each JSON line through the route and write each result as one JSON line
///
/// Blank lines are skipped. Stops at the first line that is not a message.
async fn process_lines<R, W>(
    route: &RouteHandle,
    reader: R,
    writer: &mut W,
) -> Result<OperationStatsAggregator, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = OperationStatsAggregator::new();
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let message: Message = serde_json::from_str(&line)
            .map_err(|e| CliError::invalid_input(line_no, e.to_string()))?;
        let operation = message
            .header(headers::OPERATION)
            .unwrap_or("default")
            .to_string();

        let started = Instant::now();
        let reply = route
            .request(message)
            .await
            .map_err(|e| CliError::route(route.name(), e))?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let outcome = if reply.is_fault() {
            Outcome::Fault
        } else {
            Outcome::Success
        };
        stats.update(&operation, outcome, latency_ms);
        debug!(line = line_no, operation = %operation, fault = reply.is_fault(), "Message processed");

        let mut out = serde_json::to_vec(&reply)
            .map_err(|e| CliError::invalid_input(line_no, e.to_string()))?;
        out.push(b'\n');
        writer.write_all(&out).await?;
    }

    writer.flush().await?;
    Ok(stats)
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
