//! Coin Sleuth CLI
//!
//! Investigates a crypto asset across market, on-chain, and social
//! sources, and explains composite trust scores. Stdout carries only
//! JSON or the requested table; all diagnostics go to stderr.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use investigator::explain::explain;
use investigator::social::score_social;
use investigator::verdict::compose_verdict;
use investigator::Investigator;
use serde::Deserialize;
use sleuth_core::config::Config;
use sleuth_core::types::{FactorAssessment, VerdictReport};
use sleuth_core::Error;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sleuth", version, about = "Crypto asset investigation and trust scoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a coin and print its normalized evidence context as JSON.
    Context {
        /// Coin name or canonical id, e.g. "bitcoin" or "btc".
        coin: String,
        /// Per-source timeout in seconds (overrides SOURCE_TIMEOUT_SECS).
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Compose a verdict report from externally scored factors plus the
    /// locally computed social-sentiment factor.
    Score {
        /// Coin name or canonical id.
        coin: String,
        /// Path to the external factor assessments JSON, or `-` for stdin.
        /// Expected keys: market_integrity, dev_velocity, on_chain_security.
        #[arg(long)]
        assessments: String,
    },
    /// Recompute per-factor contributions from a verdict report JSON.
    Explain {
        /// Path to the report file, or `-` to read stdin.
        path: String,
    },
}

/// Factor assessments produced by the external scoring collaborator.
#[derive(Deserialize)]
struct ExternalAssessments {
    market_integrity: FactorAssessment,
    dev_velocity: FactorAssessment,
    on_chain_security: FactorAssessment,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sleuth=info,investigator=info,sleuth_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Context { coin, timeout } => run_context(&coin, timeout).await,
        Command::Score { coin, assessments } => run_score(&coin, &assessments).await,
        Command::Explain { path } => run_explain(&path),
    }
}

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
    }
}

async fn run_context(coin: &str, timeout: Option<u64>) -> anyhow::Result<()> {
    let mut config = Config::from_env();
    if let Some(timeout) = timeout {
        config.source_timeout_secs = timeout;
    }

    let investigator = Investigator::from_config(&config);
    let investigation = match investigator.investigate(coin).await {
        Ok(investigation) => investigation,
        Err(Error::CoinNotFound { query }) => bail!("coin not found: {}", query),
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&investigation.evidence)?);
    Ok(())
}

async fn run_score(coin: &str, assessments_path: &str) -> anyhow::Result<()> {
    let raw = read_input(assessments_path)?;
    let external: ExternalAssessments =
        serde_json::from_str(&raw).context("assessments file is not valid JSON")?;

    let config = Config::from_env();
    let investigator = Investigator::from_config(&config);
    let investigation = match investigator.investigate(coin).await {
        Ok(investigation) => investigation,
        Err(Error::CoinNotFound { query }) => bail!("coin not found: {}", query),
        Err(e) => return Err(e.into()),
    };

    let social = score_social(&investigation.evidence);
    let report = compose_verdict(
        &investigation.evidence.name,
        &external.market_integrity,
        &external.dev_velocity,
        &external.on_chain_security,
        &social,
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_explain(path: &str) -> anyhow::Result<()> {
    let raw = read_input(path)?;

    let report: VerdictReport =
        serde_json::from_str(&raw).context("report is not valid verdict JSON")?;
    let explanation = explain(&report);

    println!("Score breakdown for {}", report.coin);
    println!("{:<20} {:>8} {:>10} {:>10}", "factor", "weight", "score", "points");
    for contribution in &explanation.contributions {
        println!(
            "{:<20} {:>8.2} {:>10.2} {:>10.3}",
            contribution.factor.as_str(),
            contribution.weight,
            contribution.raw_score,
            contribution.points,
        );
    }
    println!();
    println!("reported master score:  {:.2}", report.master_score);
    println!("explained master score: {:.3}", explanation.explained_master);
    Ok(())
}
