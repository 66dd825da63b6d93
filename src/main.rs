//! sitewatch - URL health monitoring.
//!
//! Classifies each configured URL as healthy, HTTP error, soft-down
//! (maintenance page served with a 200), unreachable or unresolvable, and
//! serves the result over HTTP.

mod batch;
mod check;
mod config;
mod probe;
mod snapshot;
mod targets;
mod web;

use batch::{BatchReport, BatchRunner};
use check::{Classifier, SignatureSet, StatusClass};
use config::ServerConfig;
use probe::{DnsResolver, HttpProber};
use snapshot::SnapshotStore;
use web::Server;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "sitewatch", version, about = "Check URLs for outages and maintenance pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the status page and the /status API (default)
    Serve,
    /// Check every URL once, write the snapshot and print the result
    Check {
        /// Print the records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, BoxError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("sitewatch=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let cfg = ServerConfig::load();
    let runner = Arc::new(build_runner(&cfg)?);
    let snapshots = SnapshotStore::new(&cfg.snapshot_path);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting sitewatch on {}:{}...", cfg.host, cfg.http_port);
            tracing::info!("Reading targets from {}", cfg.urls_path);

            let server = Server::new(cfg, runner, snapshots);
            server.start().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { json } => {
            let targets = targets::load_targets(&cfg.urls_path).await;
            let report = runner.run(targets).await?;

            if report.is_complete() {
                snapshots.save(&report.results).await?;
                tracing::info!("Snapshot written to {}", snapshots.path().display());
            }

            print_report(&report, json)?;

            let all_healthy = report.is_complete()
                && report.results.iter().all(|r| r.status.is_healthy());
            Ok(if all_healthy { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
    }
}

/// Wire the resolver, prober and signatures into a batch runner.
fn build_runner(cfg: &ServerConfig) -> Result<BatchRunner, BoxError> {
    let signatures = match &cfg.signatures_path {
        Some(path) => SignatureSet::from_file(path)?,
        None => SignatureSet::builtin(),
    };
    if signatures.is_empty() {
        tracing::warn!("No soft-failure signatures loaded, maintenance pages will not be detected");
    }

    let resolver = DnsResolver::new(cfg.dns_timeout);
    let prober = HttpProber::new(cfg.probe_timeout)?;
    let classifier = Classifier::new(resolver, prober, signatures);
    tracing::info!(
        "Using {} soft-failure signatures, probe timeout {:?}, DNS timeout {:?}",
        classifier.signatures().len(),
        cfg.probe_timeout,
        cfg.dns_timeout
    );

    Ok(BatchRunner::new(Arc::new(classifier), cfg.concurrency).with_deadline(cfg.batch_deadline))
}

fn print_report(report: &BatchReport, json: bool) -> Result<(), BoxError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.results)?);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &BatchReport) {
    println!("{:<60} {:<24} {}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(100));

    for result in &report.results {
        let url = if result.target.chars().count() > 57 {
            format!("{}...", result.target.chars().take(57).collect::<String>())
        } else {
            result.target.clone()
        };
        let (status, detail) = match &result.status {
            StatusClass::Healthy => ("200 OK".to_string(), String::new()),
            StatusClass::HttpError { code } => (format!("HTTP {}", code), String::new()),
            StatusClass::SoftDown { matched_pattern } => {
                ("INACTIVE".to_string(), format!("matched {:?}", matched_pattern))
            }
            StatusClass::Unreachable => ("OFFLINE".to_string(), String::new()),
            StatusClass::Unresolvable => ("UNRESOLVABLE".to_string(), String::new()),
        };
        println!("{:<60} {:<24} {}", url, status, detail);
    }

    for missing in &report.missing {
        println!("{:<60} {:<24} {}", missing.target, "MISSING", missing.reason);
    }

    let healthy = report.results.iter().filter(|r| r.status.is_healthy()).count();
    println!();
    println!("Summary:");
    println!("   Healthy: {}", healthy);
    println!("   Not healthy: {}", report.results.len() - healthy);
    if !report.missing.is_empty() {
        println!("   Missing: {}", report.missing.len());
    }
    println!("   Total: {}", report.results.len() + report.missing.len());
}
