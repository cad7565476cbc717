//! Region updates under an admission gate.
//!
//! Dyn allows only one in-progress job per session, so updates are admitted
//! through a semaphore sized by the concurrency limit. Each admitted worker
//! issues exactly one PUT and emits exactly one [`DispatchResult`].

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span};

use crate::transport::{ApiPath, ApiTransport, Method};
use crate::types::{GslbResource, RegionState, UpdatePlan};

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 1;

/// Result of one region update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub region: String,
    pub path: String,
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

pub struct BoundedDispatcher {
    transport: Arc<dyn ApiTransport>,
    concurrency_limit: usize,
}

impl BoundedDispatcher {
    /// A limit of zero is treated as one.
    pub fn new(transport: Arc<dyn ApiTransport>, concurrency_limit: usize) -> Self {
        Self {
            transport,
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Spawn one worker per planned region. Must be called within a tokio runtime.
    pub fn dispatch(&self, resource: &GslbResource, plan: UpdatePlan) -> Dispatch {
        let expected = plan.len();
        let gate = Arc::new(Semaphore::new(self.concurrency_limit));
        // Sized so that no worker ever waits on the channel.
        let (tx, rx) = mpsc::channel(expected.max(1));
        let mut workers = JoinSet::new();

        for (region, payload) in plan {
            let path = ApiPath::gslb_region(&resource.zone, &resource.fqdn, &region);
            let span = info_span!("gslb_region_update", region = %region, path = %path);
            let worker = RegionWorker {
                transport: Arc::clone(&self.transport),
                gate: Arc::clone(&gate),
                results: tx.clone(),
                region,
                path,
                payload,
            };
            workers.spawn(worker.run().instrument(span));
        }
        drop(tx);

        Dispatch {
            results: rx,
            gate,
            workers,
            expected,
        }
    }
}

/// Handle on a running dispatch.
///
/// Dropping it closes the admission gate, so workers still queued never issue
/// their call, aborts workers whose call is in flight and closes the result
/// channel, so late results are discarded.
pub struct Dispatch {
    results: mpsc::Receiver<DispatchResult>,
    gate: Arc<Semaphore>,
    workers: JoinSet<()>,
    expected: usize,
}

impl Dispatch {
    /// Number of results the dispatch will produce if every worker runs
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn results(&mut self) -> &mut mpsc::Receiver<DispatchResult> {
        &mut self.results
    }

    pub fn close(&mut self) {
        self.gate.close();
        self.workers.abort_all();
        self.results.close();
    }
}

impl Drop for Dispatch {
    fn drop(&mut self) {
        self.close();
    }
}

struct RegionWorker {
    transport: Arc<dyn ApiTransport>,
    gate: Arc<Semaphore>,
    results: mpsc::Sender<DispatchResult>,
    region: String,
    path: ApiPath,
    payload: RegionState,
}

impl RegionWorker {
    async fn run(self) {
        let Ok(_permit) = Arc::clone(&self.gate).acquire_owned().await else {
            debug!("Dispatch closed before the update was admitted");
            return;
        };

        info!("Updating GSLB region");
        debug!(payload = ?self.payload, "GSLB PUT payload");

        let error = match self.put().await {
            Ok(data) => {
                debug!(response = %data, "GSLB PUT response");
                None
            }
            Err(reason) => {
                error!(error = %reason, "Failed to put GSLB region");
                Some(reason)
            }
        };

        let result = DispatchResult {
            region: self.region,
            path: self.path.to_string(),
            error,
        };
        if self.results.send(result).await.is_err() {
            debug!("Result discarded, collection already finished");
        }
    }

    async fn put(&self) -> Result<Value, String> {
        let body = serde_json::to_value(&self.payload).map_err(|e| e.to_string())?;
        self.transport
            .send(Method::Put, &self.path, Some(body))
            .await
            .and_then(|envelope| envelope.into_data::<Value>())
            .map_err(|e| e.to_string())
    }
}
