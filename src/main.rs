// src/main.rs
// =============================================================================
// Entry point of the linkscout CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Discovery phase: fetch every seed page concurrently and collect the
//    unique links found on them (crawl module)
// 3. Probe phase: HEAD every unique link (checker module)
// 4. Print the report
//
// Failed fetches and failed probes are logged and skipped; they never change
// the exit code. Only an internal error (the HTTP client cannot be built, the
// report cannot be written) exits with 2.
// =============================================================================

mod checker; // src/checker/ - page parsing and link probing
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - concurrent discovery phase
mod error; // src/error.rs - fetch and probe errors

use anyhow::{Context, Result};
use checker::{ProbeResult, StatusRecord};
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Log lines go to stderr so stdout only carries the report.
// RUST_LOG overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let client = checker::build_client(Duration::from_secs(cli.timeout))
        .context("failed to build HTTP client")?;

    // Probing starts only once every worker has reported completion.
    let summary = crawl::discover(&client, &cli.seeds).await;
    let unique_links = summary.links.len();
    if summary.links.is_empty() {
        info!("no links found to check");
    }

    let results = checker::probe_all(&client, summary.links, cli.concurrency).await;

    let report = Report {
        seeds: summary.seeds,
        completed_seeds: summary.completed,
        failed_seeds: summary.failed,
        unique_links,
        records: results.iter().filter_map(|r| r.outcome.as_ref().ok()).collect(),
        errors: results.iter().filter_map(ProbeFailure::from_result).collect(),
    };

    print_report(&report, cli.json)
}

/// Everything printed at the end of a run.
#[derive(Debug, Serialize)]
struct Report<'a> {
    seeds: usize,
    completed_seeds: usize,
    failed_seeds: usize,
    unique_links: usize,
    records: Vec<&'a StatusRecord>,
    errors: Vec<ProbeFailure<'a>>,
}

/// A link that produced no status record, for the JSON report.
#[derive(Debug, Serialize)]
struct ProbeFailure<'a> {
    url: &'a str,
    error: String,
}

impl<'a> ProbeFailure<'a> {
    fn from_result(result: &'a ProbeResult) -> Option<Self> {
        match &result.outcome {
            Ok(_) => None,
            Err(e) => Some(ProbeFailure {
                url: &result.reference,
                error: e.to_string(),
            }),
        }
    }
}

fn print_report(report: &Report<'_>, json: bool) -> Result<()> {
    if json {
        let json_output =
            serde_json::to_string_pretty(report).context("failed to serialize report")?;
        println!("{}", json_output);
    } else {
        println!("\nFound {} unique urls:", report.unique_links);
        for record in &report.records {
            println!("{}", format_record(record));
        }
    }
    Ok(())
}

fn format_record(record: &StatusRecord) -> String {
    match &record.decode_error {
        None => format!("URL: {} STATUS: {}", record.url, record.status),
        Some(note) => format!("URL: {} STATUS: {} ({})", record.url, record.status, note),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;

    fn record(url: &str, status: u16) -> StatusRecord {
        StatusRecord {
            url: url.to_string(),
            status,
            response_time: Duration::from_millis(5),
            decode_error: None,
        }
    }

    #[test]
    fn test_format_record_line() {
        assert_eq!(
            format_record(&record("http://example.com/a b", 200)),
            "URL: http://example.com/a b STATUS: 200"
        );
    }

    #[test]
    fn test_format_record_with_decode_error() {
        let mut rec = record("http://example.com/%FF", 404);
        rec.decode_error = Some("could not percent-decode: invalid utf-8".to_string());
        assert_eq!(
            format_record(&rec),
            "URL: http://example.com/%FF STATUS: 404 (could not percent-decode: invalid utf-8)"
        );
    }

    #[test]
    fn test_report_json_lists_records_and_errors() {
        let results = vec![
            ProbeResult {
                reference: "http://example.com/".to_string(),
                outcome: Ok(record("http://example.com/", 200)),
            },
            ProbeResult {
                reference: "mailto:a@b.com".to_string(),
                outcome: Err(ProbeError::InvalidUrl {
                    reason: "no host in 'mailto:a@b.com'".to_string(),
                }),
            },
        ];
        let report = Report {
            seeds: 1,
            completed_seeds: 1,
            failed_seeds: 0,
            unique_links: 2,
            records: results.iter().filter_map(|r| r.outcome.as_ref().ok()).collect(),
            errors: results.iter().filter_map(ProbeFailure::from_result).collect(),
        };

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["unique_links"], 2);
        assert_eq!(json["records"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["records"][0]["status"], 200);
        assert_eq!(json["errors"][0]["url"], "mailto:a@b.com");
    }
}
