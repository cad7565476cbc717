//! Fan-in of dispatch results with a global deadline.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};
use tracing::{error, info, warn};

use crate::dispatcher::DispatchResult;
use crate::error::{GslbError, RegionFailure};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(20);

/// Deadlines past the clock's range are clamped to this horizon.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Collection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectState {
    Waiting { received: usize },
    Done,
    TimedOut { received: usize },
    /// The result channel closed before every result arrived
    Interrupted { received: usize },
}

impl CollectState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting { .. })
    }
}

/// Verdict of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        updated: Vec<String>,
    },
    PartialFailure {
        updated: Vec<String>,
        failed: Vec<RegionFailure>,
    },
    TimedOut {
        received: usize,
        expected: usize,
        deadline: Duration,
    },
    Interrupted {
        received: usize,
        expected: usize,
    },
}

impl Outcome {
    /// Regions that were updated, or the aggregate error
    pub fn into_result(self) -> Result<Vec<String>, GslbError> {
        match self {
            Self::Success { updated } => Ok(updated),
            Self::PartialFailure { failed, .. } => {
                Err(GslbError::RegionUpdateFailed { failures: failed })
            }
            Self::TimedOut {
                received,
                expected,
                deadline,
            } => Err(GslbError::AggregationTimedOut {
                received,
                expected,
                deadline,
            }),
            Self::Interrupted { received, expected } => {
                Err(GslbError::DispatchInterrupted { received, expected })
            }
        }
    }
}

pub struct ResultAggregator {
    expected: usize,
    deadline: Duration,
    state: CollectState,
    seen: HashSet<String>,
    results: Vec<DispatchResult>,
}

impl ResultAggregator {
    pub fn new(expected: usize, deadline: Duration) -> Self {
        let state = if expected == 0 {
            CollectState::Done
        } else {
            CollectState::Waiting { received: 0 }
        };
        Self {
            expected,
            deadline,
            state,
            seen: HashSet::with_capacity(expected),
            results: Vec::with_capacity(expected),
        }
    }

    pub fn state(&self) -> CollectState {
        self.state
    }

    /// Wait for `expected` results or the deadline, whichever comes first.
    pub async fn collect(mut self, results: &mut mpsc::Receiver<DispatchResult>) -> Outcome {
        let now = Instant::now();
        let deadline = now
            .checked_add(self.deadline)
            .unwrap_or_else(|| now + FAR_FUTURE);

        while !self.state.is_terminal() {
            match timeout_at(deadline, results.recv()).await {
                Ok(Some(result)) => self.on_result(result),
                Ok(None) => self.on_closed(),
                Err(_) => self.on_deadline(),
            }
        }

        self.into_outcome()
    }

    fn on_result(&mut self, result: DispatchResult) {
        let CollectState::Waiting { received } = self.state else {
            warn!(region = %result.region, "Result arrived after collection finished, discarding");
            return;
        };
        if !self.seen.insert(result.region.clone()) {
            warn!(region = %result.region, "Duplicate result for region, discarding");
            return;
        }

        self.results.push(result);
        let received = received + 1;
        self.state = if received == self.expected {
            CollectState::Done
        } else {
            CollectState::Waiting { received }
        };
    }

    fn on_deadline(&mut self) {
        if let CollectState::Waiting { received } = self.state {
            self.state = CollectState::TimedOut { received };
        }
    }

    fn on_closed(&mut self) {
        if let CollectState::Waiting { received } = self.state {
            self.state = CollectState::Interrupted { received };
        }
    }

    fn into_outcome(self) -> Outcome {
        match self.state {
            CollectState::Done => {}
            CollectState::TimedOut { received } => {
                error!(
                    received,
                    expected = self.expected,
                    deadline = ?self.deadline,
                    "Update requests did not return in time"
                );
                return Outcome::TimedOut {
                    received,
                    expected: self.expected,
                    deadline: self.deadline,
                };
            }
            CollectState::Interrupted { received } | CollectState::Waiting { received } => {
                error!(received, expected = self.expected, "Update workers stopped early");
                return Outcome::Interrupted {
                    received,
                    expected: self.expected,
                };
            }
        }

        let mut updated = Vec::new();
        let mut failed = Vec::new();
        for result in self.results {
            match result.error {
                None => {
                    info!(region = %result.region, path = %result.path, "GSLB update succeeded");
                    updated.push(result.region);
                }
                Some(reason) => {
                    error!(region = %result.region, path = %result.path, error = %reason, "GSLB update failed");
                    failed.push(RegionFailure {
                        region: result.region,
                        path: result.path,
                        reason,
                    });
                }
            }
        }
        updated.sort();
        failed.sort_by(|a, b| a.region.cmp(&b.region));

        if failed.is_empty() {
            Outcome::Success { updated }
        } else {
            Outcome::PartialFailure { updated, failed }
        }
    }
}
