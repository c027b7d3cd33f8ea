// src/crawl/worker.rs
// =============================================================================
// One fetch worker runs per seed page.
//
// Lifecycle:
//   Fetching -> Tokenizing -> Done(success)
//   Fetching -> Done(failure)
//
// The worker never touches the discovery set. It only talks to the
// coordinator through two channels:
// - `discovered`: one message per normalized link reference (awaited send,
//   the coordinator keeps receiving until every worker is done)
// - `done`: exactly one CompletionSignal, sent from a Drop guard so that
//   every exit path (early error return, panic, task abort) reports in
// =============================================================================

use crate::checker::extract_hrefs;
use crate::error::FetchError;
use reqwest::Client;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::normalize::normalize_reference;

/// A discovered link, after normalization. Compared by exact string
/// equality.
pub type LinkReference = String;

/// How a worker finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The page was fetched and `links` references were emitted.
    Crawled { links: usize },
    /// The page could not be fetched or read.
    Failed,
}

/// The "I am done" message each worker sends exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSignal {
    pub seed: String,
    pub outcome: WorkerOutcome,
}

/// Sends the completion signal when dropped.
///
/// The outcome starts as `Failed` and is only flipped once the page has been
/// fully processed, so any early exit is reported as a failure.
struct CompletionGuard {
    seed: String,
    outcome: WorkerOutcome,
    done: mpsc::UnboundedSender<CompletionSignal>,
}

impl CompletionGuard {
    fn new(seed: String, done: mpsc::UnboundedSender<CompletionSignal>) -> Self {
        Self {
            seed,
            outcome: WorkerOutcome::Failed,
            done,
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let signal = CompletionSignal {
            seed: std::mem::take(&mut self.seed),
            outcome: self.outcome,
        };
        // The receiver only goes away once the coordinator stopped caring.
        let _ = self.done.send(signal);
    }
}

/// Crawls a single seed page and reports back through the two channels.
///
/// The completion guard is armed before the returned future is first
/// polled, so even a worker dropped before it ever ran reports in.
pub fn fetch_worker(
    client: Client,
    seed: String,
    discovered: mpsc::Sender<LinkReference>,
    done: mpsc::UnboundedSender<CompletionSignal>,
) -> impl Future<Output = ()> + Send + 'static {
    let guard = CompletionGuard::new(seed.clone(), done);

    async move {
        // Bind the whole guard so the future owns it; it drops (and signals)
        // only when the future finishes or is dropped.
        let mut guard = guard;

        info!("attempting to crawl {}", seed);

        match crawl_seed(&client, &seed, &discovered).await {
            Ok(links) => {
                debug!(seed = %seed, links, "finished crawling");
                guard.outcome = WorkerOutcome::Crawled { links };
            }
            Err(e) => {
                error!("failed to crawl {}: {}", seed, e);
            }
        }
    }
}

// GETs the page, extracts every anchor href and emits its normalized form.
//
// The response (and with it the connection) is owned here and released on
// every return path. The base for normalization is always the seed itself.
async fn crawl_seed(
    client: &Client,
    seed: &str,
    discovered: &mpsc::Sender<LinkReference>,
) -> Result<usize, FetchError> {
    let response = client.get(seed).send().await?;

    let status = response.status();
    if !status.is_success() {
        debug!(seed, status = status.as_u16(), "seed answered with a non-success status");
    }

    let body = response.bytes().await?;

    // Tokenize synchronously: the href iterator is not Send and must not be
    // held across the sends below.
    let references: Vec<LinkReference> = extract_hrefs(&body)
        .iter()
        .map(|href| normalize_reference(seed, href))
        .collect();

    let mut emitted = 0;
    for reference in references {
        if discovered.send(reference).await.is_err() {
            // Coordinator is gone, nobody will read the rest.
            break;
        }
        emitted += 1;
    }

    Ok(emitted)
}
