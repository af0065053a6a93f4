//! Reqres conformance suite runner.
//!
//! Usage: `reqres-conformance [--list] [SCENARIO_ID...]`
//!
//! Runs every catalog scenario (or only the named ones) against the
//! configured base URL and prints one line per scenario. Exit code 0 when
//! the run is green, 1 when any scenario failed, errored or passed
//! unexpectedly, 2 on configuration or usage errors.

use std::process::ExitCode;

use clap::Parser;
use reqres_application::{ApplicationResult, ConformanceConfig, catalog};
use reqres_domain::response::reason_phrase;
use reqres_domain::{ConformanceReport, Expectation};
use reqres_infrastructure::{ConformanceRunner, ReqwestHttpClient};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Conformance suite for the reqres mock REST API.
#[derive(Parser, Debug)]
#[command(name = "reqres-conformance", version)]
struct Cli {
    /// Print the scenario catalog and exit.
    #[arg(long, conflicts_with = "scenarios")]
    list: bool,
    /// Scenario ids to run, in order. Runs the whole catalog when omitted.
    #[arg(value_name = "SCENARIO_ID")]
    scenarios: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with code 2, help and version with 0.
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.list {
        for scenario in catalog::catalog() {
            let marker = match scenario.expectation {
                Expectation::Pass => "",
                Expectation::KnownFailure { .. } => " (known failure)",
            };
            println!("{:<36} {}{marker}", scenario.id, scenario.summary);
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli.scenarios).await {
        Ok(report) => {
            print_report(&report);
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "conformance run could not start");
            ExitCode::from(2)
        }
    }
}

async fn run(ids: &[String]) -> ApplicationResult<ConformanceReport> {
    let config = ConformanceConfig::load()?;
    let scenarios = catalog::select(ids)?;

    tracing::info!(
        base_url = %config.base_url,
        scenarios = scenarios.len(),
        "Starting reqres conformance run v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = ReqwestHttpClient::new(config.timeout)?;
    let runner = ConformanceRunner::new(client, config);
    Ok(runner.run_all(&scenarios).await)
}

fn print_report(report: &ConformanceReport) {
    println!("reqres conformance against {}", report.base_url);
    for result in &report.scenarios {
        let status = result
            .status
            .map_or_else(|| "---".to_string(), |s| format!("{s} {}", reason_phrase(s)));
        println!(
            "{:<5} {:<36} {status:<16} {:>6}ms",
            result.outcome.label(),
            result.scenario_id,
            result.duration_ms
        );
        if !result.outcome.is_ok() {
            for line in result.failure_lines() {
                println!("      - {line}");
            }
        }
    }
    println!("{}", report.summary());
}
