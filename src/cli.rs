// src/cli.rs
// =============================================================================
// Command-line interface, parsed with clap's derive API.
//
// The seed pages are plain positional arguments. Everything else is an
// optional flag with a default, so `linkscout https://a.example https://b.example`
// is a complete invocation.
// =============================================================================

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "linkscout",
    version,
    about = "Collects the links found on a set of seed pages and reports their HTTP status",
    long_about = "linkscout fetches every seed page concurrently, collects the links found \
                  directly on them, and sends a HEAD request to each unique link to report \
                  its status code and response time. Links on the linked pages are not followed."
)]
pub struct Cli {
    /// Seed pages to collect links from (e.g., https://example.com)
    pub seeds: Vec<String>,

    /// Output results in JSON format instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds, for both page fetches and probes
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Maximum number of HEAD probes in flight at once
    #[arg(long, default_value_t = 50, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: usize,
}
