// src/error.rs
// =============================================================================
// Typed errors for the two places the pipeline talks to the network.
//
// None of these ever reach the process exit status: a failed fetch ends one
// worker, a failed probe skips one link, and both are only logged.
// =============================================================================

use thiserror::Error;

/// Why a seed page could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Why a discovered link produced no status record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The reference is not a well-formed URL; no request was sent.
    #[error("invalid URL: {reason}")]
    InvalidUrl { reason: String },

    /// The HEAD request itself failed.
    #[error("unreachable ({kind}): {message}")]
    Unreachable { kind: TransportFailure, message: String },
}

/// Coarse classification of a failed request, for the operator log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    TooManyRedirects,
    Other,
}

impl TransportFailure {
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_redirect() {
            TransportFailure::TooManyRedirects
        } else if error.is_connect() {
            TransportFailure::Connect
        } else {
            TransportFailure::Other
        }
    }
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransportFailure::Timeout => "timeout",
            TransportFailure::Connect => "connection failed",
            TransportFailure::TooManyRedirects => "too many redirects",
            TransportFailure::Other => "request failed",
        };
        f.write_str(label)
    }
}
