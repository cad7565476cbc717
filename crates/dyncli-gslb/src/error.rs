use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single call to the remote API
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("API call status was {status}, not success{}", format_messages(.messages))]
    Status {
        status: String,
        messages: Vec<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

fn format_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        String::new()
    } else {
        format!(": {}", messages.join("; "))
    }
}

/// A region whose update did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFailure {
    pub region: String,
    pub path: String,
    pub reason: String,
}

impl fmt::Display for RegionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.region, self.path, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum GslbError {
    #[error("failed to query {path}: {source}")]
    RemoteQueryFailed {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("invalid label pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{} of the GSLB region updates failed: {}", .failures.len(), join_failures(.failures))]
    RegionUpdateFailed { failures: Vec<RegionFailure> },

    #[error("update requests did not return after {deadline:?} ({received} of {expected} results)")]
    AggregationTimedOut {
        received: usize,
        expected: usize,
        deadline: Duration,
    },

    #[error("update workers stopped early ({received} of {expected} results)")]
    DispatchInterrupted { received: usize, expected: usize },

    #[error("could not read GSLB TTL from {path}: {source}")]
    TtlUnavailable {
        path: String,
        #[source]
        source: TransportError,
    },
}

fn join_failures(failures: &[RegionFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl GslbError {
    /// Region codes whose update failed, if this is a per-region failure
    pub fn failed_regions(&self) -> Vec<&str> {
        match self {
            Self::RegionUpdateFailed { failures } => {
                failures.iter().map(|f| f.region.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}
