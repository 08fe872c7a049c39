//! CLI host for the CLA reconciler.
//!
//! Reads one `pull_request` webhook payload and runs the registered handlers
//! against GitHub. Run `cla-reconcile --help` for usage information.

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cla::github::rest::DEFAULT_API_URL;
use cla::{
    ClaConfig, ClaReconciler, DryRunClient, GitHubClient, HandlerTable, Outcome,
    PullRequestEvent, RestClient,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cla-reconcile")]
#[command(about = "Keep CLA labels on GitHub pull requests up to date")]
#[command(version)]
struct Cli {
    /// Output format: json, text
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file (defaults to CLA_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the labels of the PR named in a webhook payload
    Reconcile {
        /// Path to a pull_request webhook payload, or - for stdin
        #[arg(short, long, default_value = "-")]
        event: String,

        /// GitHub API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
        token: String,

        /// GitHub API base URL
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Log label and comment changes instead of making them
        #[arg(short, long)]
        dry_run: bool,
    },

    /// List the registered handlers and what they do
    Handlers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let mut table = HandlerTable::new();
    table.register(ClaReconciler::new(config).context("Invalid CLA configuration")?);

    match cli.command {
        Some(Commands::Reconcile {
            event,
            token,
            api_url,
            dry_run,
        }) => run_reconcile(&table, &event, &token, &api_url, dry_run, cli.format),
        None => run_reconcile(&table, "-", &env_token(), DEFAULT_API_URL, false, cli.format),
        Some(Commands::Handlers) => {
            run_handlers(&table);
            Ok(())
        }
    }
}

fn env_token() -> String {
    std::env::var("GITHUB_TOKEN").unwrap_or_default()
}

fn load_config(path: Option<&Path>) -> Result<ClaConfig> {
    match path {
        Some(path) => ClaConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ClaConfig::from_env().context("Failed to load config from environment"),
    }
}

fn read_event(source: &str) -> Result<PullRequestEvent> {
    let body = if source == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read event from {source}"))?
    };

    PullRequestEvent::from_slice(&body).context("Failed to parse pull_request payload")
}

fn run_reconcile(
    table: &HandlerTable,
    source: &str,
    token: &str,
    api_url: &str,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let event = read_event(source)?;
    let rest = RestClient::with_base_url(api_url, token).context("Failed to create GitHub client")?;

    let client: Box<dyn GitHubClient> = if dry_run {
        info!("Dry run: label and comment changes will only be logged");
        Box::new(DryRunClient::new(rest))
    } else {
        Box::new(rest)
    };

    let results = table.dispatch(client.as_ref(), &event);

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = results
                .iter()
                .map(|(name, outcome)| serde_json::json!({ "handler": name, "result": outcome }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            for (name, outcome) in &results {
                println!("{name}: {}", describe(outcome));
            }
        }
    }

    Ok(())
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ignored { action } => format!("ignored '{action}' event"),
        Outcome::Aborted { target, reason } => format!("aborted on {target}: {reason:?}"),
        Outcome::Reconciled(report) if report.plan.is_noop() => {
            format!("{} already up to date", report.target)
        }
        Outcome::Reconciled(report) => format!(
            "{}: ready={} applied {:?} ({} failed)",
            report.target, report.eligibility.ready, report.plan.actions, report.failed_mutations
        ),
    }
}

fn run_handlers(table: &HandlerTable) {
    for handler in table.handlers() {
        println!("{}\n  {}\n", handler.name(), handler.description());
    }
}
