// src/crawl/coordinator.rs
// =============================================================================
// The discovery phase.
//
// How it works:
// 1. Spawn one fetch worker per seed page, all at once (no cap)
// 2. Listen on the discovery channel and the completion channel at the same
//    time with tokio::select!
// 3. Every discovered link goes into the DiscoverySet (duplicates are
//    absorbed); every completion signal bumps a counter
// 4. Stop once the counter reaches the number of seeds, then close the
//    discovery channel and drain whatever is still buffered in it
//
// The coordinator is the only reader of both channels and the only writer of
// the set, so nothing here needs a lock.
// =============================================================================

use reqwest::Client;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::worker::{fetch_worker, CompletionSignal, LinkReference, WorkerOutcome};

/// Capacity of the discovery channel. Workers wait when it is full.
const DISCOVERY_BUFFER: usize = 64;

/// The deduplicated set of discovered link references.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoverySet {
    links: HashSet<LinkReference>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference. Returns false if it was already present.
    pub fn insert(&mut self, reference: LinkReference) -> bool {
        self.links.insert(reference)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, reference: &str) -> bool {
        self.links.contains(reference)
    }
}

impl IntoIterator for DiscoverySet {
    type Item = LinkReference;
    type IntoIter = std::collections::hash_set::IntoIter<LinkReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

/// What the discovery phase ends with.
#[derive(Debug)]
pub struct CrawlSummary {
    /// Number of workers launched (one per seed).
    pub seeds: usize,
    /// Completion signals observed. Equals `seeds` unless a worker vanished
    /// without reporting, which the completion guard rules out.
    pub completed: usize,
    /// Workers whose page could not be fetched.
    pub failed: usize,
    /// Every reference emitted by every worker, deduplicated.
    pub links: DiscoverySet,
}

/// Runs the discovery phase over `seeds` and returns once every worker has
/// reported completion.
pub async fn discover(client: &Client, seeds: &[String]) -> CrawlSummary {
    let (link_tx, mut link_rx) = mpsc::channel::<LinkReference>(DISCOVERY_BUFFER);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<CompletionSignal>();

    for seed in seeds {
        tokio::spawn(fetch_worker(
            client.clone(),
            seed.clone(),
            link_tx.clone(),
            done_tx.clone(),
        ));
    }

    // Only the workers hold senders from here on.
    drop(link_tx);
    drop(done_tx);

    let mut links = DiscoverySet::new();
    let mut completed = 0;
    let mut failed = 0;

    while completed < seeds.len() {
        tokio::select! {
            Some(reference) = link_rx.recv() => {
                links.insert(reference);
            }
            signal = done_rx.recv() => match signal {
                Some(signal) => {
                    completed += 1;
                    if signal.outcome == WorkerOutcome::Failed {
                        failed += 1;
                    }
                    debug!(seed = %signal.seed, completed, total = seeds.len(), "worker finished");
                }
                None => {
                    warn!(
                        completed,
                        total = seeds.len(),
                        "completion channel closed before every worker reported"
                    );
                    break;
                }
            },
        }
    }

    // Every worker is done, so no new sends can arrive. Anything that was
    // still buffered when the last completion won the select is drained here.
    link_rx.close();
    while let Some(reference) = link_rx.recv().await {
        links.insert(reference);
    }

    info!(
        seeds = seeds.len(),
        failed,
        unique_links = links.len(),
        "discovery finished"
    );

    CrawlSummary {
        seeds: seeds.len(),
        completed,
        failed,
        links,
    }
}
