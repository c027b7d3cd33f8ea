// src/checker/http.rs
// =============================================================================
// The probe phase: checks whether each discovered link is alive.
//
// For every link reference:
// 1. Make sure it is a well-formed URL with a host (otherwise: InvalidUrl,
//    and no request is sent)
// 2. Time a HEAD request (lightweight, no body download)
// 3. Percent-decode the reference for display
// 4. Produce a StatusRecord, or an Unreachable error if the request failed
//
// No retries, and one bad link never stops the others. Probes run
// concurrently with a bounded pool; the order of results is not meaningful.
// =============================================================================

use crate::crawl::DiscoverySet;
use crate::error::{ProbeError, TransportFailure};
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::Client;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use tracing::warn;
use url::Url;

/// Most redirects a single request follows before giving up.
const MAX_REDIRECTS: usize = 10;

/// Availability of one discovered link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    /// The link, percent-decoded for display. Holds the raw reference when
    /// decoding failed (see `decode_error`).
    pub url: String,
    /// HTTP status code of the HEAD response.
    pub status: u16,
    /// Time from sending the request to receiving the response headers.
    #[serde(rename = "response_time_ms", serialize_with = "serialize_millis")]
    pub response_time: Duration,
    /// Set when the reference could not be percent-decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

/// The outcome of probing one link reference.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub reference: String,
    pub outcome: Result<StatusRecord, ProbeError>,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}

/// Builds the HTTP client shared by the fetch workers and the prober.
///
/// `timeout` bounds every single request, so one unresponsive host can only
/// stall its own worker or probe for that long.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Probes every link in the set, at most `concurrency` at a time.
pub async fn probe_all(client: &Client, links: DiscoverySet, concurrency: usize) -> Vec<ProbeResult> {
    let probes = links.into_iter().map(|reference| {
        let client = client.clone();
        async move {
            let outcome = probe_link(&client, &reference).await;
            if let Err(e) = &outcome {
                warn!("{}: {}", reference, e);
            }
            ProbeResult { reference, outcome }
        }
    });

    stream::iter(probes)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

/// Probes a single link reference with a HEAD request.
pub async fn probe_link(client: &Client, reference: &str) -> Result<StatusRecord, ProbeError> {
    let url = validate_reference(reference)?;

    let start = Instant::now();
    let result = client.head(url).send().await;
    let response_time = start.elapsed();

    let response = result.map_err(|e| ProbeError::Unreachable {
        kind: TransportFailure::classify(&e),
        message: e.to_string(),
    })?;

    let (url, decode_error) = display_url(reference);

    Ok(StatusRecord {
        url,
        status: response.status().as_u16(),
        response_time,
        decode_error,
    })
}

/// Checks that a reference is a well-formed absolute URL with a host.
///
/// References like `mailto:a@b.com` parse as URLs but have no host to send a
/// request to, so they are rejected here as well.
pub fn validate_reference(reference: &str) -> Result<Url, ProbeError> {
    let url = Url::parse(reference).map_err(|e| ProbeError::InvalidUrl {
        reason: e.to_string(),
    })?;

    if !url.has_host() {
        return Err(ProbeError::InvalidUrl {
            reason: format!("no host in '{}'", reference),
        });
    }

    Ok(url)
}

// Percent-decodes a reference for display. On failure the raw reference is
// kept and the reason is returned alongside it.
fn display_url(reference: &str) -> (String, Option<String>) {
    if let Some(position) = malformed_escape(reference) {
        return (
            reference.to_string(),
            Some(format!("could not percent-decode: malformed escape at byte {}", position)),
        );
    }

    match urlencoding::decode(reference) {
        Ok(decoded) => (decoded.into_owned(), None),
        Err(e) => (
            reference.to_string(),
            Some(format!("could not percent-decode: {}", e)),
        ),
    }
}

// Offset of the first '%' not followed by two hex digits. The decoder
// passes such sequences through untouched, so they are caught up front.
fn malformed_escape(reference: &str) -> Option<usize> {
    let bytes = reference.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let well_formed = b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        (!well_formed).then_some(i)
    })
}
